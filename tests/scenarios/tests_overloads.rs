//! Overload groups built by the pipeline.

use bindmeta::decl::Item;
use bindmeta::overload::OverloadGroup;
use bindmeta::typesystem::{BindingSpec, TypeEntry};

use crate::helpers::model_helpers::{base_spec, build, class, func, unit};

fn labels(group: &OverloadGroup) -> Vec<&str> {
    group.children(0).map(|n| &*n.label).collect()
}

fn make_hierarchy_spec() -> BindingSpec {
    base_spec()
        .with_entry(TypeEntry::object_type("Base"))
        .with_entry(TypeEntry::object_type("Derived"))
        .with_entry(TypeEntry::object_type("Leaf"))
        .with_entry(TypeEntry::function("f", Vec::new()))
}

fn make_hierarchy_items(free: &[&str]) -> Vec<Item> {
    let mut items = vec![
        Item::Class(class("Base", &[])),
        Item::Class(class("Derived", &[]).with_base("Base")),
        Item::Class(class("Leaf", &[]).with_base("Derived")),
    ];
    items.extend(free.iter().map(|s| Item::Function(func(s))));
    items
}

#[test]
fn test_derived_argument_is_checked_first() {
    let decls = unit(make_hierarchy_items(&["void f(Derived* d)", "void f(Base* b)"]));
    let model = build(&decls, &make_hierarchy_spec());
    let group = model.global_overload("f").unwrap();
    assert_eq!(labels(group), vec!["Derived", "Base"]);

    // Declaration order does not matter.
    let decls = unit(make_hierarchy_items(&["void f(Base* b)", "void f(Derived* d)"]));
    let model = build(&decls, &make_hierarchy_spec());
    let group = model.global_overload("f").unwrap();
    assert_eq!(labels(group), vec!["Derived", "Base"]);
}

#[test]
fn test_select_picks_most_specific_candidate() {
    let decls = unit(make_hierarchy_items(&["void f(Base* b)", "void f(Derived* d)"]));
    let model = build(&decls, &make_hierarchy_spec());
    let group = model.global_overload("f").unwrap();
    let resolver = model.resolver();
    let entry = |name: &str| model.registry.find(name).unwrap();
    let signature = |name: &str| {
        resolver
            .select(group, &[entry(name)])
            .map(|id| model.model.function(id).original_signature.clone())
    };

    assert_eq!(signature("Leaf").as_deref(), Some("f(Derived*)"));
    assert_eq!(signature("Derived").as_deref(), Some("f(Derived*)"));
    assert_eq!(signature("Base").as_deref(), Some("f(Base*)"));
    assert_eq!(signature("int"), None);
}

#[test]
fn test_member_overloads_per_class() {
    let spec = base_spec().with_entry(TypeEntry::value_type("Canvas"));
    let decls = unit([Item::Class(class(
        "Canvas",
        &[
            "void draw(int x, int y)",
            "void draw(double x, double y)",
            "void draw(bool fill, int x = 0, int y = 0)",
            "int width() const",
        ],
    ))]);
    let model = build(&decls, &spec);

    let draw = model.overload("Canvas", "draw").unwrap();
    assert_eq!(draw.len(), 3);
    assert_eq!((draw.min_args(), draw.max_args()), (1, 3));
    assert_eq!(labels(draw), vec!["double", "bool", "int"]);
    assert!(!model.overload("Canvas", "width").unwrap().is_overloaded());

    let names: Vec<&str> = model.overloads_of("Canvas").iter().map(|g| &*g.name).collect();
    assert!(names.contains(&"Canvas"));
}
