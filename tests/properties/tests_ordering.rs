//! Ordering invariants of the dependency graph and class emission.

use bindmeta::decl::{ClassDecl, Item, NamespaceDecl};
use bindmeta::graph::DependencyGraph;
use bindmeta::typesystem::TypeEntry;
use rstest::rstest;

use crate::helpers::model_helpers::{base_spec, build, class, unit, with_value_types};

/// Graph from an edge list over `n` nodes labelled by index.
fn graph(n: usize, edges: &[(usize, usize)]) -> DependencyGraph<usize> {
    let mut graph = DependencyGraph::with_nodes(0..n);
    for (from, to) in edges {
        graph.add_edge(*from, *to);
    }
    graph
}

#[rstest]
#[case(4, &[])]
#[case(4, &[(3, 0), (2, 1)])]
#[case(5, &[(4, 3), (3, 2), (2, 1), (1, 0)])]
#[case(6, &[(0, 5), (1, 5), (5, 2), (4, 3), (3, 2)])]
fn test_sort_is_idempotent(#[case] n: usize, #[case] edges: &[(usize, usize)]) {
    let first = graph(n, edges).topological_sort().unwrap();
    for (from, to) in edges {
        let pos = |node: usize| first.iter().position(|x| *x == node).unwrap();
        assert!(pos(*from) < pos(*to), "edge {} -> {} violated", from, to);
    }

    // Relabel nodes in sorted order; sorting again changes nothing.
    let rank = |node: usize| first.iter().position(|x| *x == node).unwrap();
    let relabelled: Vec<(usize, usize)> = edges.iter().map(|(a, b)| (rank(*a), rank(*b))).collect();
    let second = graph(n, &relabelled).topological_sort().unwrap();
    assert_eq!(second, (0..n).collect::<Vec<_>>());
}

#[test]
fn test_sort_keeps_insertion_order_of_unrelated_nodes() {
    let order = graph(5, &[(4, 1)]).topological_sort().unwrap();
    assert_eq!(order, vec![0, 2, 3, 4, 1]);
}

#[test]
fn test_bases_and_enclosing_classes_come_first() {
    let spec = with_value_types(
        base_spec(),
        &["Leaf", "Middle", "Root", "Outer", "Outer::Inner", "Outer::Inner::Core"],
    )
    .with_entry(TypeEntry::namespace("ui"))
    .with_entry(TypeEntry::object_type("ui::Panel"))
    .with_entry(TypeEntry::object_type("ui::Window"));

    let outer = ClassDecl::new("Outer").with_item(Item::Class(
        ClassDecl::new("Inner")
            .with_base("Middle")
            .with_item(Item::Class(ClassDecl::new("Core").with_base("Leaf"))),
    ));
    let ui = NamespaceDecl::new("ui")
        .with_item(Item::Class(ClassDecl::new("Window").with_base("Panel")))
        .with_item(Item::Class(ClassDecl::new("Panel").with_base("Root")));
    let decls = unit([
        Item::Class(class("Leaf", &["int depth() const"]).with_base("Middle")),
        Item::Namespace(ui),
        Item::Class(outer),
        Item::Class(ClassDecl::new("Middle").with_base("Root")),
        Item::Class(ClassDecl::new("Root")),
    ]);
    let model = build(&decls, &spec);

    let order: Vec<_> = model.model.ordered_classes().map(|c| c.id).collect();
    let position = |id| order.iter().position(|x| *x == id).unwrap();
    assert_eq!(order.len(), model.model.class_count());
    for class in model.model.classes() {
        for base in &class.bases {
            assert!(
                position(*base) < position(class.id),
                "base {} after {}",
                model.model.class(*base).name,
                class.name
            );
        }
        if let Some(enclosing) = class.enclosing {
            assert!(
                position(enclosing) < position(class.id),
                "enclosing {} after {}",
                model.model.class(enclosing).name,
                class.name
            );
        }
    }
    assert!(model.diagnostics.warnings().is_empty(), "{}", model.diagnostics.report());
}
