//! Free operators rehomed into classes.

use bindmeta::decl::Item;
use bindmeta::typesystem::TypeEntry;

use crate::helpers::model_assertions::{functions_named, get_class};
use crate::helpers::model_helpers::{base_spec, build, class, func, unit};

#[test]
fn test_equality_operators_rehome_onto_widget() {
    let spec = base_spec().with_entry(TypeEntry::value_type("Widget"));
    let decls = unit([
        Item::Class(class("Widget", &["int id() const"])),
        Item::Function(func("bool operator==(const Widget& a, const Widget& b)")),
        Item::Function(func("bool operator==(int id, const Widget& w)")),
    ]);
    let model = build(&decls, &spec);
    let widget = get_class(&model, "Widget");

    let equality = functions_named(&model, "Widget", "operator==");
    assert_eq!(equality.len(), 2);
    let (reverse, forward): (Vec<_>, Vec<_>) = equality
        .into_iter()
        .partition(|f| f.attributes.is_reverse_operator);

    assert_eq!(forward.len(), 1);
    assert_eq!(forward[0].arguments.len(), 1);
    assert_eq!(forward[0].arguments[0].ty.name.as_ref(), "Widget");

    assert_eq!(reverse.len(), 1);
    assert_eq!(reverse[0].arguments.len(), 1);
    assert_eq!(reverse[0].arguments[0].ty.name.as_ref(), "int");
    assert_eq!(reverse[0].arguments[0].name.as_str(), "id");
    assert_eq!(reverse[0].owner, Some(widget.id));

    assert!(widget.attributes.has_equality);
    assert!(model.global_overload("operator==").is_none());

    let group = model.overload("Widget", "operator==").unwrap();
    assert_eq!(group.len(), 2);
    assert_eq!((group.min_args(), group.max_args()), (1, 1));
}
