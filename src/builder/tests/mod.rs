#![allow(clippy::unwrap_used)]

use super::*;
use crate::decl::{FieldDecl, FunctionDecl};
use crate::model::MetaFunction;

mod tests_inheritance;
mod tests_operators;

pub(super) fn func(signature: &str) -> FunctionDecl {
    FunctionDecl::parse(signature).unwrap()
}

pub(super) fn field(name: &str, ty: &str) -> FieldDecl {
    FieldDecl::new(name, crate::signature::parse_type(ty).unwrap())
}

pub(super) fn typedef(name: &str, target: &str) -> Item {
    Item::Typedef(crate::decl::TypedefDecl::new(
        name,
        crate::signature::parse_type(target).unwrap(),
    ))
}

pub(super) fn try_build_with(
    spec: &BindingSpec,
    unit: &TranslationUnit,
    options: &BuilderOptions,
) -> Result<(TypeRegistry, BuildOutput), BuildError> {
    let mut registry = TypeRegistry::from_spec(spec).unwrap();
    let output = MetaBuilder::new(&mut registry, spec, options).build(unit)?;
    Ok((registry, output))
}

pub(super) fn build_with(
    spec: &BindingSpec,
    unit: &TranslationUnit,
    options: &BuilderOptions,
) -> (TypeRegistry, BuildOutput) {
    try_build_with(spec, unit, options).unwrap()
}

pub(super) fn build(spec: &BindingSpec, unit: &TranslationUnit) -> (TypeRegistry, BuildOutput) {
    build_with(spec, unit, &BuilderOptions::default())
}

/// Functions of the class named `class`.
pub(super) fn functions<'m>(output: &'m BuildOutput, class: &str) -> Vec<&'m MetaFunction> {
    let id = output.model.find_class(class).unwrap();
    output.model.functions_of(id).collect()
}

pub(super) fn function<'m>(output: &'m BuildOutput, class: &str, name: &str) -> &'m MetaFunction {
    functions(output, class)
        .into_iter()
        .find(|f| &*f.name == name)
        .unwrap()
}

#[test]
fn test_empty_unit_builds_empty_model() {
    let spec = BindingSpec::new().with_primitives(&["int"]);
    let (_, output) = build(&spec, &TranslationUnit::new());
    assert_eq!(output.model.class_count(), 0);
    assert!(output.diagnostics.is_empty());
}
