#![allow(clippy::unwrap_used)]

use super::*;
use crate::decl::{ClassDecl, NamespaceDecl};
use crate::diagnostics::{RejectCategory, RejectReason, codes};
use crate::model::FunctionKind;
use crate::typesystem::TypeEntry;

#[test]
fn test_bases_resolve_regardless_of_declaration_order() {
    let spec = BindingSpec::new()
        .with_entry(TypeEntry::object_type("Leaf"))
        .with_entry(TypeEntry::object_type("Mid"))
        .with_entry(TypeEntry::object_type("Root"));
    let unit = TranslationUnit::new()
        .with_item(Item::Class(ClassDecl::new("Leaf").with_base("Mid")))
        .with_item(Item::Class(ClassDecl::new("Mid").with_base("Root")))
        .with_item(Item::Class(ClassDecl::new("Root")));
    let (_, output) = build(&spec, &unit);

    let model = &output.model;
    let leaf = model.find_class("Leaf").unwrap();
    let mid = model.find_class("Mid").unwrap();
    let root = model.find_class("Root").unwrap();
    assert_eq!(model.class(leaf).bases, vec![mid]);
    assert_eq!(model.ancestors(leaf), vec![mid, root]);
}

#[test]
fn test_base_lookup_is_scoped() {
    let spec = BindingSpec::new()
        .with_entry(TypeEntry::namespace("ns"))
        .with_entry(TypeEntry::object_type("ns::Base"))
        .with_entry(TypeEntry::object_type("ns::Derived"));
    let ns = NamespaceDecl::new("ns")
        .with_item(Item::Class(ClassDecl::new("Derived").with_base("Base")))
        .with_item(Item::Class(ClassDecl::new("Base")));
    let unit = TranslationUnit::new().with_item(Item::Namespace(ns));
    let (_, output) = build(&spec, &unit);

    let derived = output.model.find_class("ns::Derived").unwrap();
    let base = output.model.find_class("ns::Base").unwrap();
    assert_eq!(output.model.class(derived).bases, vec![base]);
}

#[test]
fn test_cyclic_base_is_dropped() {
    let spec = BindingSpec::new()
        .with_entry(TypeEntry::object_type("A"))
        .with_entry(TypeEntry::object_type("B"));
    let unit = TranslationUnit::new()
        .with_item(Item::Class(ClassDecl::new("A").with_base("B")))
        .with_item(Item::Class(ClassDecl::new("B").with_base("A")));
    let (_, output) = build(&spec, &unit);

    let a = output.model.find_class("A").unwrap();
    let b = output.model.find_class("B").unwrap();
    assert_eq!(output.model.class(a).bases, vec![b]);
    assert!(output.model.class(b).bases.is_empty());
    assert_eq!(
        output.diagnostics.reason(RejectCategory::Class, "B"),
        Some(RejectReason::CyclicDependency)
    );
}

#[test]
fn test_unexposed_base_is_a_warning() {
    let spec = BindingSpec::new().with_entry(TypeEntry::object_type("Derived"));
    let unit = TranslationUnit::new()
        .with_item(Item::Class(ClassDecl::new("Derived").with_base("Hidden")));
    let (_, output) = build(&spec, &unit);

    let derived = output.model.find_class("Derived").unwrap();
    assert!(output.model.class(derived).bases.is_empty());
    assert!(output.diagnostics.has_warning(codes::UNMATCHED_SPECIFICATION));
}

fn make_box_spec() -> BindingSpec {
    BindingSpec::new()
        .with_primitives(&["int", "bool"])
        .with_entry(TypeEntry::value_type("Box"))
        .with_entry(TypeEntry::typedef("IntBox", "Box<int>"))
        .with_entry(TypeEntry::typedef("BadBox", "Box<Missing>"))
        .with_entry(TypeEntry::value_type("CountBox"))
}

fn make_box_unit() -> TranslationUnit {
    let template = ClassDecl::new("Box")
        .with_template_parameter("T")
        .with_function(func("Box()"))
        .with_function(func("T value() const"))
        .with_function(func("void setValue(const T& v)"))
        .with_function(func("Box copy() const"))
        .with_function(func("bool operator==(const Box& other) const"))
        .with_field(field("data", "T"))
        .with_field(FieldDecl {
            is_static: true,
            ..field("count", "int")
        });
    let count_box = ClassDecl::new("CountBox")
        .with_base("Box<int>")
        .with_function(func("CountBox()"))
        .with_function(func("int value() const"));
    TranslationUnit::new()
        .with_item(Item::Class(template))
        .with_item(Item::Class(count_box))
        .with_item(typedef("IntBox", "Box<int>"))
        .with_item(typedef("BadBox", "Box<Missing>"))
}

#[test]
fn test_typedef_instantiates_template() {
    let (_, output) = build(&make_box_spec(), &make_box_unit());
    let model = &output.model;
    let template = model.find_class("Box").unwrap();
    let int_box = model.find_class("IntBox").unwrap();
    let class = model.class(int_box);

    assert!(class.attributes.is_typedef);
    assert_eq!(class.template_base, Some(template));
    assert_eq!(class.template_arguments.len(), 1);
    assert_eq!(class.template_arguments[0].name.as_ref(), "int");

    let value = function(&output, "IntBox", "value");
    assert_eq!(value.return_type.as_ref().unwrap().name.as_ref(), "int");
    assert!(value.attributes.is_synthesized);
    assert_eq!(value.owner, Some(int_box));
    assert_eq!(value.declaring_class, Some(template));

    let set_value = function(&output, "IntBox", "setValue");
    let arg = &set_value.arguments[0].ty;
    assert_eq!(arg.name.as_ref(), "int");
    assert!(arg.is_const);

    let copy = function(&output, "IntBox", "copy");
    assert_eq!(copy.return_type.as_ref().unwrap().name.as_ref(), "IntBox");

    let ctor = function(&output, "IntBox", "IntBox");
    assert_eq!(ctor.kind, FunctionKind::Constructor);

    let data = class.field("data").unwrap();
    assert_eq!(data.ty.name.as_ref(), "int");
    assert!(class.field("count").is_none());
}

#[test]
fn test_instantiation_copies_template_capabilities() {
    let (_, output) = build(&make_box_spec(), &make_box_unit());
    let model = &output.model;
    let template = &model.class(model.find_class("Box").unwrap()).attributes;
    let int_box = &model.class(model.find_class("IntBox").unwrap()).attributes;

    assert!(template.has_equality);
    assert!(template.is_hashable);
    assert!(template.is_clonable);
    assert_eq!(int_box.is_clonable, template.is_clonable);
    assert_eq!(int_box.is_hashable, template.is_hashable);
    assert_eq!(int_box.has_equality, template.has_equality);
}

#[test]
fn test_declared_subclass_shadows_template_members() {
    let (_, output) = build(&make_box_spec(), &make_box_unit());
    let values: Vec<_> = functions(&output, "CountBox")
        .into_iter()
        .filter(|f| &*f.name == "value")
        .collect();
    assert_eq!(values.len(), 1);
    assert!(!values[0].attributes.is_synthesized);

    // Constructors are only inherited by typedef classes.
    let ctors = functions(&output, "CountBox")
        .into_iter()
        .filter(|f| f.kind == FunctionKind::Constructor)
        .count();
    assert_eq!(ctors, 1);
    assert_eq!(function(&output, "CountBox", "setValue").arity(), 1);
}

#[test]
fn test_unresolvable_template_argument_fails_instantiation() {
    let (_, output) = build(&make_box_spec(), &make_box_unit());
    assert_eq!(
        output.diagnostics.reason(RejectCategory::Class, "BadBox"),
        Some(RejectReason::TemplateInstantiationFailure)
    );
}
