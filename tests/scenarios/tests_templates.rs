//! Template inheritance instantiation through typedefs.

use bindmeta::decl::{FieldDecl, Item, TypedefDecl};
use bindmeta::model::FunctionKind;
use bindmeta::signature::parse_type;
use bindmeta::typesystem::{BindingSpec, TypeEntry};

use crate::helpers::model_assertions::{functions_named, get_class};
use crate::helpers::model_helpers::{base_spec, build, class, unit};

fn make_box_spec() -> BindingSpec {
    base_spec()
        .with_entry(TypeEntry::value_type("Box"))
        .with_entry(TypeEntry::typedef("IntBox", "Box<int>"))
        .with_entry(TypeEntry::typedef("DoubleBox", "Box<double>"))
}

fn make_box_items() -> Vec<Item> {
    let template = class(
        "Box",
        &[
            "Box()",
            "T value() const",
            "void setValue(const T& value)",
            "Box swapped(const Box& other) const",
            "bool operator==(const Box& other) const",
        ],
    )
    .with_template_parameter("T")
    .with_field(FieldDecl::new("stored", parse_type("T").unwrap()));
    vec![
        Item::Class(template),
        Item::Typedef(TypedefDecl::new("IntBox", parse_type("Box<int>").unwrap())),
        Item::Typedef(TypedefDecl::new("DoubleBox", parse_type("Box<double>").unwrap())),
    ]
}

#[test]
fn test_typedef_class_receives_substituted_members() {
    let model = build(&unit(make_box_items()), &make_box_spec());
    let int_box = get_class(&model, "IntBox");
    assert!(int_box.attributes.is_typedef);
    assert_eq!(int_box.template_arguments[0].name.as_ref(), "int");

    let value = &functions_named(&model, "IntBox", "value")[0];
    assert_eq!(value.return_type.as_ref().unwrap().name.as_ref(), "int");

    let set_value = &functions_named(&model, "IntBox", "setValue")[0];
    assert_eq!(set_value.arguments[0].ty.signature(), "const int&");

    let swapped = &functions_named(&model, "IntBox", "swapped")[0];
    assert_eq!(swapped.return_type.as_ref().unwrap().name.as_ref(), "IntBox");
    assert_eq!(swapped.arguments[0].ty.name.as_ref(), "IntBox");

    let ctors: Vec<_> = functions_named(&model, "IntBox", "IntBox")
        .into_iter()
        .filter(|f| f.kind == FunctionKind::Constructor)
        .collect();
    assert_eq!(ctors.len(), 1);
    assert_eq!(int_box.field("stored").unwrap().ty.name.as_ref(), "int");
}

#[test]
fn test_template_stays_reusable_across_instantiations() {
    let model = build(&unit(make_box_items()), &make_box_spec());
    let template = get_class(&model, "Box");

    let double_value = &functions_named(&model, "DoubleBox", "value")[0];
    assert_eq!(double_value.return_type.as_ref().unwrap().name.as_ref(), "double");

    let generic_value = &functions_named(&model, "Box", "value")[0];
    assert!(generic_value.return_type.as_ref().unwrap().is_template_argument());
    assert!(template.is_template());
}

#[test]
fn test_instantiation_flags_match_template() {
    let model = build(&unit(make_box_items()), &make_box_spec());
    let template = get_class(&model, "Box").attributes;
    for name in ["IntBox", "DoubleBox"] {
        let attributes = get_class(&model, name).attributes;
        assert_eq!(attributes.is_clonable, template.is_clonable, "{name}");
        assert_eq!(attributes.is_hashable, template.is_hashable, "{name}");
        assert_eq!(attributes.has_equality, template.has_equality, "{name}");
    }
    assert!(template.has_equality);
    assert!(template.is_hashable);
}
