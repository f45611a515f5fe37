#![allow(clippy::unwrap_used)]

use super::*;
use crate::decl::ClassDecl;
use crate::diagnostics::{RejectCategory, RejectReason};
use crate::signature::normalize_signature;
use crate::typesystem::{CodeGeneration, TypeEntry};

fn operators<'m>(output: &'m BuildOutput, class: &str, name: &str) -> Vec<&'m MetaFunction> {
    functions(output, class)
        .into_iter()
        .filter(|f| &*f.original_name == name)
        .collect()
}

fn make_widget_spec() -> BindingSpec {
    BindingSpec::new()
        .with_primitives(&["int", "bool"])
        .with_entry(TypeEntry::value_type("Widget"))
}

fn make_widget_unit(free: &[&str]) -> TranslationUnit {
    free.iter().fold(
        TranslationUnit::new().with_item(Item::Class(ClassDecl::new("Widget"))),
        |unit, signature| unit.with_item(Item::Function(func(signature))),
    )
}

#[test]
fn test_equality_operators_rehome_onto_operand_class() {
    let unit = make_widget_unit(&[
        "bool operator==(const Widget& a, const Widget& b)",
        "bool operator==(int a, const Widget& b)",
    ]);
    let (_, output) = build(&make_widget_spec(), &unit);
    let widget = output.model.find_class("Widget").unwrap();

    let found = operators(&output, "Widget", "operator==");
    assert_eq!(found.len(), 2);

    let forward = found.iter().find(|f| !f.attributes.is_reverse_operator).unwrap();
    assert_eq!(forward.arity(), 1);
    assert_eq!(forward.arguments[0].ty.name.as_ref(), "Widget");
    assert_eq!(forward.declaring_class, Some(widget));
    assert!(!forward.attributes.is_static);

    let reverse = found.iter().find(|f| f.attributes.is_reverse_operator).unwrap();
    assert_eq!(reverse.arity(), 1);
    assert_eq!(reverse.arguments[0].ty.name.as_ref(), "int");
    assert_eq!(reverse.arguments[0].index, 0);

    assert_eq!(output.model.global_functions().count(), 0);
    assert!(output.model.class(widget).attributes.has_equality);
}

#[test]
fn test_unary_operator_takes_its_operand_as_receiver() {
    let unit = make_widget_unit(&["Widget operator-(const Widget& w)"]);
    let (_, output) = build(&make_widget_spec(), &unit);
    let negate = function(&output, "Widget", "operator-");
    assert_eq!(negate.arity(), 0);
    assert!(!negate.attributes.is_reverse_operator);
}

#[test]
fn test_operator_without_exposed_operand_is_rejected() {
    let unit = make_widget_unit(&["bool operator==(int a, int b)"]);
    let (_, output) = build(&make_widget_spec(), &unit);
    let signature = normalize_signature("bool operator==(int a, int b)").unwrap();
    assert_eq!(
        output.diagnostics.reason(RejectCategory::Function, &signature),
        Some(RejectReason::NotInSpecification)
    );
    assert_eq!(output.model.global_functions().count(), 0);
}

#[test]
fn test_operators_stay_free_when_rehoming_is_off() {
    let options = BuilderOptions {
        rehome_operators: false,
        ..BuilderOptions::default()
    };
    let declared = "bool operator==(const Widget& a, const Widget& b)";
    let (_, output) = build_with(&make_widget_spec(), &make_widget_unit(&[declared]), &options);
    assert!(operators(&output, "Widget", "operator==").is_empty());
    assert_eq!(
        output
            .diagnostics
            .reason(RejectCategory::Function, &normalize_signature(declared).unwrap()),
        Some(RejectReason::NotInSpecification)
    );
}

#[test]
fn test_binary_operator_prefers_returned_right_operand() {
    let spec = BindingSpec::new()
        .with_entry(TypeEntry::value_type("Matrix"))
        .with_entry(TypeEntry::value_type("Vector"));
    let unit = TranslationUnit::new()
        .with_item(Item::Class(ClassDecl::new("Matrix")))
        .with_item(Item::Class(ClassDecl::new("Vector")))
        .with_item(Item::Function(func("Vector operator*(const Matrix& m, const Vector& v)")))
        .with_item(Item::Function(func("Matrix operator*(const Matrix& a, const Matrix& b)")));
    let (_, output) = build(&spec, &unit);

    let on_vector = function(&output, "Vector", "operator*");
    assert!(on_vector.attributes.is_reverse_operator);
    assert_eq!(on_vector.arguments[0].ty.name.as_ref(), "Matrix");

    let on_matrix = function(&output, "Matrix", "operator*");
    assert!(!on_matrix.attributes.is_reverse_operator);
    assert_eq!(operators(&output, "Matrix", "operator*").len(), 1);
}

fn make_stream_build(stream_codegen: CodeGeneration) -> BuildOutput {
    let spec = BindingSpec::new()
        .with_entry(
            TypeEntry::object_type("QDataStream")
                .with_codegen(stream_codegen)
                .with_complex(|c| c.stream = true),
        )
        .with_entry(TypeEntry::value_type("Widget"));
    let unit = TranslationUnit::new()
        .with_item(Item::Class(ClassDecl::new("QDataStream")))
        .with_item(Item::Class(ClassDecl::new("Widget")))
        .with_item(Item::Function(func(
            "QDataStream& operator<<(QDataStream& s, const Widget& w)",
        )));
    build(&spec, &unit).1
}

#[test]
fn test_stream_operator_goes_to_exposed_stream() {
    let output = make_stream_build(CodeGeneration::Enabled);
    let model = &output.model;
    let stream = model.find_class("QDataStream").unwrap();
    let widget = model.find_class("Widget").unwrap();

    let shift = function(&output, "QDataStream", "operator<<");
    assert!(!shift.attributes.is_reverse_operator);
    assert_eq!(shift.arguments[0].ty.name.as_ref(), "Widget");

    assert!(model.class(stream).include_dependencies.contains(&widget));
    assert!(model.class(widget).include_dependencies.contains(&stream));
}

#[test]
fn test_stream_operator_falls_back_to_streamed_class() {
    let output = make_stream_build(CodeGeneration::ReferenceOnly);
    let shift = function(&output, "Widget", "operator<<");
    assert!(shift.attributes.is_reverse_operator);
    assert_eq!(shift.arguments[0].ty.name.as_ref(), "QDataStream");
    assert!(operators(&output, "QDataStream", "operator<<").is_empty());
}
