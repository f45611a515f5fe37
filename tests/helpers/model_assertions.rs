//! Assertion helpers over built binding models.

use bindmeta::model::{MetaClass, MetaFunction};
use bindmeta::{BindingModel, RejectCategory, RejectReason};

/// Get a built class, failing the test if it is missing.
pub fn get_class<'a>(model: &'a BindingModel, name: &str) -> &'a MetaClass {
    let id = model
        .model
        .find_class(name)
        .unwrap_or_else(|| panic!("Expected class '{}' to be built", name));
    model.model.class(id)
}

/// Functions of a class with the given exposed name.
pub fn functions_named<'a>(model: &'a BindingModel, class: &str, name: &str) -> Vec<&'a MetaFunction> {
    let id = get_class(model, class).id;
    model
        .model
        .functions_of(id)
        .filter(|f| &*f.name == name)
        .collect()
}

/// Assert a class was rejected with the expected reason.
pub fn assert_class_rejected(model: &BindingModel, name: &str, expected: RejectReason) {
    assert_eq!(
        model.diagnostics.reason(RejectCategory::Class, name),
        Some(expected),
        "Expected class '{}' to be rejected as {:?}\n{}",
        name,
        expected,
        model.diagnostics.report()
    );
}

/// Position of a class in emission order.
pub fn order_position(model: &BindingModel, name: &str) -> usize {
    model
        .model
        .ordered_classes()
        .position(|c| &*c.name == name)
        .unwrap_or_else(|| panic!("Expected class '{}' in emission order", name))
}
