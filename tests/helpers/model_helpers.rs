//! Builders for declarations, specifications and binding models.

use bindmeta::decl::{ClassDecl, FunctionDecl, Item, TranslationUnit};
use bindmeta::typesystem::{BindingSpec, TypeEntry};
use bindmeta::{BindingModel, BuilderOptions, build_binding_model};

/// Parse a literal function declaration.
pub fn func(signature: &str) -> FunctionDecl {
    FunctionDecl::parse(signature)
        .unwrap_or_else(|e| panic!("invalid signature '{}': {}", signature, e))
}

/// A class declaration with the given member functions.
pub fn class(name: &str, functions: &[&str]) -> ClassDecl {
    functions
        .iter()
        .fold(ClassDecl::new(name), |decl, signature| decl.with_function(func(signature)))
}

pub fn unit(items: impl IntoIterator<Item = Item>) -> TranslationUnit {
    items.into_iter().fold(TranslationUnit::new(), TranslationUnit::with_item)
}

/// A specification with the common primitives registered.
pub fn base_spec() -> BindingSpec {
    BindingSpec::new().with_primitives(&["int", "double", "bool", "char"])
}

/// Value-type entries for each name.
pub fn with_value_types(spec: BindingSpec, names: &[&str]) -> BindingSpec {
    names
        .iter()
        .fold(spec, |spec, name| spec.with_entry(TypeEntry::value_type(*name)))
}

/// Build with default options, panicking on a fatal error.
pub fn build(unit: &TranslationUnit, spec: &BindingSpec) -> BindingModel {
    build_with(unit, spec, &BuilderOptions::default())
}

pub fn build_with(unit: &TranslationUnit, spec: &BindingSpec, options: &BuilderOptions) -> BindingModel {
    build_binding_model(unit, spec, options)
        .unwrap_or_else(|e| panic!("build failed: {}", e))
}
