//! Class dependency cycles.

use bindmeta::RejectReason;
use bindmeta::decl::Item;
use bindmeta::diagnostics::codes;
use bindmeta::graph::DependencyGraph;

use crate::helpers::model_assertions::{assert_class_rejected, order_position};
use crate::helpers::model_helpers::{base_spec, build, class, unit, with_value_types};

#[test]
fn test_graph_reports_cycle() {
    let mut graph = DependencyGraph::with_nodes(["A", "B"]);
    graph.add_edge(0, 1);
    graph.add_edge(1, 0);
    let cycle = graph.topological_sort().unwrap_err();
    assert_eq!(cycle.nodes.len(), 2);
    assert_eq!(graph.describe(&cycle.nodes).matches("->").count(), 1);
}

#[test]
fn test_class_cycle_falls_back_to_declaration_order() {
    let spec = with_value_types(base_spec(), &["Before", "A", "B", "After"]);
    let decls = unit([
        Item::Class(class("Before", &[])),
        Item::Class(class("A", &["void f(B b = B())"])),
        Item::Class(class("B", &["void g(A a = A())"])),
        Item::Class(class("After", &[]).with_base("Before")),
    ]);
    let model = build(&decls, &spec);

    assert!(model.diagnostics.has_warning(codes::CLASS_ORDER_CYCLE));
    assert_class_rejected(&model, "A", RejectReason::CyclicDependency);
    assert_class_rejected(&model, "B", RejectReason::CyclicDependency);
    let order: Vec<usize> = ["Before", "A", "B", "After"]
        .iter()
        .map(|name| order_position(&model, name))
        .collect();
    assert_eq!(order, vec![0, 1, 2, 3]);

    // The build still completes and overloads are produced.
    assert!(model.overload("A", "f").is_some());
}

#[test]
fn test_cyclic_inheritance_drops_closing_link() {
    let spec = with_value_types(base_spec(), &["A", "B"]);
    let decls = unit([
        Item::Class(class("A", &[]).with_base("B")),
        Item::Class(class("B", &[]).with_base("A")),
    ]);
    let model = build(&decls, &spec);

    assert_class_rejected(&model, "B", RejectReason::CyclicDependency);
    assert!(!model.diagnostics.has_warning(codes::CLASS_ORDER_CYCLE));
    assert!(order_position(&model, "B") < order_position(&model, "A"));
}
