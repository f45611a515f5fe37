//! Resolution, synthesis and overload invariants.

use bindmeta::decl::{ClassDecl, Item, NamespaceDecl};
use bindmeta::model::FunctionKind;
use bindmeta::typesystem::{BindingSpec, ContainerKind, RejectRule, TypeEntry};
use bindmeta::{BindingModel, TranslationUnit};
use rstest::rstest;

use crate::helpers::model_assertions::functions_named;
use crate::helpers::model_helpers::{base_spec, build, class, unit, with_value_types};

fn make_library() -> (TranslationUnit, BindingSpec) {
    let spec = with_value_types(base_spec(), &["Text", "Color", "Shape", "Circle", "Canvas"])
        .with_entry(TypeEntry::namespace("gfx"))
        .with_entry(TypeEntry::value_type("gfx::Brush"))
        .with_entry(TypeEntry::container("QList", ContainerKind::List))
        .with_entry(TypeEntry::value_type("Locked"))
        .with_rejection(RejectRule::member("Locked", "Locked"));
    let gfx = NamespaceDecl::new("gfx").with_item(Item::Class(class(
        "Brush",
        &["Brush(const Color& color)", "Color color() const"],
    )));
    let decls = unit([
        Item::Class(class("Text", &["Text(const char* s)", "int length() const"])),
        Item::Class(class("Color", &["Color(int r, int g, int b)", "Color(const Text& name)"])),
        Item::Class(class("Shape", &["virtual double area() const = 0"])),
        Item::Class(class("Circle", &["double area() const override"]).with_base("Shape")),
        Item::Class(class(
            "Canvas",
            &[
                "void paint(const Shape& s)",
                "void paint(const Circle& c)",
                "void paint(const QList<Shape*>& shapes)",
                "void label(const Text& t, int size = 12)",
                "void label(const char* t)",
                "void fill(const gfx::Brush& b)",
                "void fill(const Color& c)",
            ],
        )),
        Item::Namespace(gfx),
        Item::Class(ClassDecl::new("Locked")),
    ]);
    (decls, spec)
}

/// Stable rendering of every built function.
fn signatures(model: &BindingModel) -> Vec<String> {
    model
        .model
        .ordered_classes()
        .flat_map(|c| model.model.functions_of(c.id))
        .chain(model.model.global_functions())
        .map(|f| {
            let ret = f.return_type.as_ref().map(|t| t.signature()).unwrap_or_default();
            format!("{ret} {}", f.original_signature)
        })
        .collect()
}

#[test]
fn test_resolution_is_deterministic() {
    let (decls, spec) = make_library();
    let first = build(&decls, &spec);
    let second = build(&decls, &spec);
    assert_eq!(signatures(&first), signatures(&second));
    assert_eq!(first.diagnostics.report(), second.diagnostics.report());
}

#[rstest]
#[case("Text", 0)]
#[case("Shape", 1)]
#[case("Circle", 1)]
#[case("Canvas", 1)]
#[case("Locked", 0)]
fn test_default_constructor_synthesized_once(#[case] name: &str, #[case] expected: usize) {
    let (decls, spec) = make_library();
    let model = build(&decls, &spec);
    let defaults = functions_named(&model, name, name)
        .into_iter()
        .filter(|f| f.kind == FunctionKind::Constructor && f.arguments.is_empty())
        .count();
    assert_eq!(defaults, expected);
}

#[test]
fn test_overload_bounds_cover_candidates() {
    let (decls, spec) = make_library();
    let model = build(&decls, &spec);
    let groups = model
        .class_overloads
        .values()
        .flatten()
        .chain(&model.global_overloads);
    for group in groups {
        assert!(group.min_args() <= group.max_args(), "{}", group.name);
        for id in group.candidates() {
            let arity = model.model.function(*id).arguments.len();
            assert!(
                group.min_args() <= arity && arity <= group.max_args(),
                "{}::{} arity {} outside {}..={}",
                group.scope,
                group.name,
                arity,
                group.min_args(),
                group.max_args()
            );
        }
    }
}

#[test]
fn test_conversion_sources_come_first() {
    let (decls, spec) = make_library();
    let model = build(&decls, &spec);
    let order = |name: &str| -> Vec<String> {
        model
            .overload("Canvas", name)
            .unwrap()
            .children(0)
            .map(|n| n.label.to_string())
            .collect()
    };

    assert_eq!(order("label"), vec!["char*", "Text"]);
    assert_eq!(order("fill"), vec!["Color", "gfx::Brush"]);
    let paint = order("paint");
    let position = |label: &str| paint.iter().position(|l| l == label).unwrap();
    assert!(position("Circle") < position("Shape"));
    assert!(paint.contains(&"QList<Shape>".to_string()));
}
