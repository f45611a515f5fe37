//! Class admission through the specification.

use bindmeta::decl::Item;
use bindmeta::typesystem::{ApiVersion, RejectRule, TypeEntry};
use bindmeta::{BuilderOptions, RejectReason};
use rstest::rstest;

use crate::helpers::model_assertions::{assert_class_rejected, get_class};
use crate::helpers::model_helpers::{base_spec, build, build_with, class, unit};

#[test]
fn test_rejection_pattern_disables_matching_classes() {
    let spec = base_spec()
        .with_entry(TypeEntry::value_type("HelperUtil"))
        .with_entry(TypeEntry::value_type("Helper"))
        .with_entry(TypeEntry::value_type("Widget"))
        .with_rejection(RejectRule::class("Help.*"));
    let decls = unit([
        Item::Class(class("HelperUtil", &["int size() const"])),
        Item::Class(class("Helper", &[])),
        Item::Class(class("Widget", &[])),
    ]);
    let model = build(&decls, &spec);

    assert_class_rejected(&model, "HelperUtil", RejectReason::GenerationDisabled);
    assert_class_rejected(&model, "Helper", RejectReason::GenerationDisabled);
    assert!(model.model.find_class("HelperUtil").is_none());
    assert!(model.overloads_of("HelperUtil").is_empty());
    get_class(&model, "Widget");
}

#[rstest]
#[case(None, true)]
#[case(Some(ApiVersion::new(6, 5, 0)), true)]
#[case(Some(ApiVersion::new(6, 4, 0)), false)]
fn test_api_version_gates_entries(#[case] api_version: Option<ApiVersion>, #[case] built: bool) {
    let spec = base_spec().with_entry(TypeEntry::value_type("Recent").since(ApiVersion::new(6, 5, 0)));
    let decls = unit([Item::Class(class("Recent", &[]))]);
    let options = BuilderOptions {
        api_version,
        ..BuilderOptions::default()
    };
    let model = build_with(&decls, &spec, &options);

    assert_eq!(model.model.find_class("Recent").is_some(), built);
    if !built {
        assert_class_rejected(&model, "Recent", RejectReason::GenerationDisabled);
    }
}

#[test]
fn test_rejected_members_are_recorded_not_fatal() {
    let spec = base_spec()
        .with_entry(TypeEntry::object_type("Widget"))
        .with_rejection(RejectRule::member("Widget", "debug.*"));
    let decls = unit([Item::Class(class(
        "Widget",
        &["void debugDump() const", "void show()", "void take(Missing m)"],
    ))]);
    let model = build(&decls, &spec);

    let rejected = model.diagnostics.rejected_functions();
    assert_eq!(
        rejected.get("Widget::debugDump()const").map(|r| r.reason),
        Some(RejectReason::GenerationDisabled)
    );
    assert_eq!(
        rejected.get("Widget::take(Missing)").map(|r| r.reason),
        Some(RejectReason::UnmatchedArgumentType)
    );
    assert!(model.overload("Widget", "show").is_some());
    assert!(model.diagnostics.report().contains("take"));
}
