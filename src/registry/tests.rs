#![allow(clippy::unwrap_used)]

use super::*;
use crate::typesystem::{CodeGeneration, ContainerKind, FunctionModification};
use rstest::rstest;

fn make_registry() -> TypeRegistry {
    let spec = BindingSpec::new()
        .with_primitives(&["int", "double", "bool"])
        .with_entry(TypeEntry::primitive("qint32").aliasing("int"))
        .with_entry(TypeEntry::primitive("qint64").aliasing("qint32"))
        .with_entry(TypeEntry::container("QList", ContainerKind::List))
        .with_entry(TypeEntry::smart_pointer("QSharedPointer", "data").accepting("Widget"))
        .with_entry(TypeEntry::namespace("ns"))
        .with_entry(TypeEntry::value_type("ns::Point"))
        .with_entry(TypeEntry::object_type("Widget"))
        .with_entry(TypeEntry::value_type("Box"))
        .with_entry(TypeEntry::typedef("IntBox", "Box<int>"))
        .with_rejection(RejectRule::class("Help.*"))
        .with_rejection(RejectRule::member("*", "qt_metacall"))
        .with_rejection(RejectRule::member("Widget", "debug.*"));
    TypeRegistry::from_spec(&spec).unwrap()
}

#[test]
fn test_bootstrap_entries_exist() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.get(registry.void()).kind, TypeEntryKind::Void);
    assert_eq!(registry.get(registry.varargs()).kind, TypeEntryKind::Varargs);
    assert_eq!(registry.find("void"), Some(registry.void()));
}

#[test]
fn test_scope_is_linked_on_register() {
    let registry = make_registry();
    let point = registry.find_complex("ns::Point").unwrap();
    let ns = registry.find_namespace("ns").unwrap();
    assert_eq!(registry.get(point).scope, Some(ns));
}

#[test]
fn test_find_skips_unusable_entries() {
    let mut registry = TypeRegistry::new();
    registry.register(TypeEntry::primitive("int").not_preferred());
    let usable = registry.register(TypeEntry::primitive("int"));
    assert_eq!(registry.find_all("int").len(), 2);
    assert_eq!(registry.find("int"), Some(usable));

    registry.register(TypeEntry::value_type("Gone").with_codegen(CodeGeneration::Disabled));
    assert_eq!(registry.find("Gone"), None);
}

#[test]
fn test_entries_newer_than_api_version_are_hidden() {
    let spec = BindingSpec::new()
        .with_entry(TypeEntry::value_type("Fresh").since(ApiVersion::new(6, 5, 0)));
    let registry = TypeRegistry::from_spec(&spec)
        .unwrap()
        .with_api_version(Some(ApiVersion::new(6, 4, 0)));
    assert_eq!(registry.find("Fresh"), None);
    assert_eq!(registry.find_all("Fresh").len(), 1);

    let registry = registry.with_api_version(Some(ApiVersion::new(6, 5, 0)));
    assert!(registry.find("Fresh").is_some());
}

#[test]
fn test_kind_filtered_lookups() {
    let registry = make_registry();
    assert!(registry.find_primitive("int").is_some());
    assert!(registry.find_primitive("Widget").is_none());
    assert!(registry.find_container("QList<int>").is_some());
    assert!(registry.find_smart_pointer("QSharedPointer").is_some());
    assert!(registry.find_namespace("ns").is_some());
    assert!(registry.find_complex("Widget").is_some());
    assert!(registry.find_enum("Widget").is_none());
}

#[test]
fn test_lookup_type_rejects_mixed_kinds() {
    let mut registry = TypeRegistry::new();
    registry.register(TypeEntry::value_type("Color"));
    registry.register(TypeEntry::enumeration("Color"));
    let err = registry.lookup_type("Color").unwrap_err();
    assert!(matches!(err, ResolveError::Ambiguous { .. }));

    let mut registry = TypeRegistry::new();
    let first = registry.register(TypeEntry::primitive("int"));
    registry.register(TypeEntry::primitive("int"));
    assert_eq!(registry.lookup_type("int").unwrap(), Some(first));
}

#[rstest]
#[case("HelperUtil", None, true)]
#[case("Helper", None, true)]
#[case("MyHelper", None, false)]
#[case("Widget", Some("qt_metacall"), true)]
#[case("", Some("qt_metacall"), true)]
#[case("Widget", Some("debugDump"), true)]
#[case("Widget", Some("resize"), false)]
#[case("Other", Some("debugDump"), false)]
#[case("Widget", None, false)]
fn test_rejection_rules(
    #[case] class: &str,
    #[case] member: Option<&str>,
    #[case] rejected: bool,
) {
    let registry = make_registry();
    assert_eq!(registry.is_rejected(class, member).is_some(), rejected);
}

#[test]
fn test_typedef_clones_source_entry() {
    let mut registry = make_registry();
    let box_id = registry.find_complex("Box").unwrap();
    let clone = registry.find_complex("IntBox").unwrap();
    let entry = registry.get(clone);
    assert_eq!(entry.kind, TypeEntryKind::Value);
    assert_eq!(entry.typedef_of, Some(box_id));

    let typedef = registry
        .find_all("IntBox")
        .iter()
        .copied()
        .find(|id| registry.get(*id).kind == TypeEntryKind::Typedef)
        .unwrap();
    assert_eq!(registry.resolve_typedef(typedef).unwrap(), clone);
    assert_eq!(registry.lookup_type("IntBox").unwrap(), Some(clone));
}

#[test]
fn test_typedef_with_unknown_source_is_spec_error() {
    let spec = BindingSpec::new().with_entry(TypeEntry::typedef("Alias", "Missing<int>"));
    let err = TypeRegistry::from_spec(&spec).unwrap_err();
    assert!(matches!(err, SpecError::Unknown { .. }));
}

#[test]
fn test_constants_and_arrays_are_interned() {
    let mut registry = TypeRegistry::new();
    let three = registry.constant(3);
    assert_eq!(registry.constant(3), three);
    assert_eq!(registry.get(three).constant_value(), Some(3));

    let int = registry.register(TypeEntry::primitive("int"));
    let arr = registry.array(int, Some(4));
    assert_eq!(registry.array(int, Some(4)), arr);
    assert_ne!(registry.array(int, Some(5)), arr);
    assert_eq!(&*registry.get(arr).name, "int[4]");
}

#[test]
fn test_template_argument_entries() {
    let mut registry = TypeRegistry::new();
    let t = registry.template_argument("Box", "T", 0);
    assert_eq!(registry.template_argument("Box", "T", 0), t);
    assert_eq!(registry.get(t).template_ordinal(), Some(0));
    assert_eq!(&*registry.get(t).name, "Box::T");
}

#[test]
fn test_basic_aliased_primitive_follows_chain() {
    let registry = make_registry();
    let qint64 = registry.find_primitive("qint64").unwrap();
    let int = registry.find_primitive("int").unwrap();
    assert_eq!(registry.basic_aliased_primitive(qint64), int);
    assert_eq!(registry.basic_aliased_primitive(int), int);
}

#[test]
fn test_smart_pointer_instantiation_constraint() {
    let registry = make_registry();
    let sp = registry.find_smart_pointer("QSharedPointer").unwrap();
    assert!(registry.accepts_pointee(sp, "Widget"));
    assert!(!registry.accepts_pointee(sp, "ns::Point"));
}

#[test]
fn test_modification_signatures_are_normalized() {
    let spec = BindingSpec::new().with_entry(TypeEntry::object_type("Widget").with_complex(|c| {
        c.function_modifications
            .push(FunctionModification::new("resize( int w , int h )").renamed("resize_to"));
    }));
    let registry = TypeRegistry::from_spec(&spec).unwrap();
    let widget = registry.find_complex("Widget").unwrap();
    let detail = registry.get(widget).complex().unwrap();
    assert_eq!(detail.function_modifications[0].signature, "resize(int,int)");
}

#[test]
fn test_invalid_rejection_pattern_is_spec_error() {
    let spec = BindingSpec::new().with_rejection(RejectRule::class("Foo("));
    assert!(matches!(
        TypeRegistry::from_spec(&spec),
        Err(SpecError::InvalidPattern { .. })
    ));
}
