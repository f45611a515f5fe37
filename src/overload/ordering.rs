//! Sibling ordering of decision nodes.

use std::sync::Arc;

use indexmap::IndexMap;

use super::{ArgumentKey, DecisionNode, NodeIndex, OverloadGroup, OverloadResolver};
use crate::diagnostics::{Diagnostics, codes};
use crate::graph::DependencyGraph;
use crate::model::MetaType;

/// Precedence class of a sibling's type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Category {
    AnyObject,
    Sequence,
    Buffer,
    Container,
    String,
    ByteSequence,
    Enum,
    Integer,
    NonInteger,
    Other,
}

impl Category {
    /// Label shared by every sibling of a generic category.
    fn folded_label(self) -> Option<&'static str> {
        match self {
            Category::AnyObject => Some("<any-object>"),
            Category::Sequence => Some("<sequence>"),
            Category::Buffer => Some("<buffer>"),
            _ => None,
        }
    }

    /// Ordering between categories alone.
    fn precedes(self, other: Category) -> bool {
        match (self, other) {
            (Category::AnyObject, _) => false,
            (_, Category::AnyObject) => true,
            (Category::Buffer | Category::Container, Category::Sequence) => true,
            (Category::String, Category::ByteSequence) => true,
            (Category::Enum | Category::NonInteger, Category::Integer) => true,
            _ => false,
        }
    }
}

impl OverloadResolver<'_> {
    pub(super) fn order_siblings(&self, group: &mut OverloadGroup, diagnostics: &mut Diagnostics) {
        for index in 0..group.nodes.len() {
            if group.nodes[index].children.len() < 2 {
                continue;
            }
            if let Some(order) = self.sort_siblings(group, index, diagnostics) {
                group.nodes[index].children = order;
            }
        }
    }

    fn category(&self, node: &DecisionNode) -> Category {
        let name = node.type_name();
        let rules = self.rules;
        if rules.is_any_object(name) {
            Category::AnyObject
        } else if rules.is_buffer(name) {
            Category::Buffer
        } else if rules.is_sequence(name) {
            Category::Sequence
        } else if rules.is_string(name) {
            Category::String
        } else if rules.is_byte_sequence(name) {
            Category::ByteSequence
        } else {
            match &node.ty {
                Some(ty) if ty.is_container() => Category::Container,
                Some(ty) if ty.is_enum() => Category::Enum,
                Some(ty) if ty.is_cstring() => Category::Other,
                _ if rules.is_integer(name) => Category::Integer,
                _ if rules.is_non_integer(name) => Category::NonInteger,
                _ => Category::Other,
            }
        }
    }

    /// New child order for `parent`, or `None` to keep build order.
    fn sort_siblings(
        &self,
        group: &OverloadGroup,
        parent: NodeIndex,
        diagnostics: &mut Diagnostics,
    ) -> Option<Vec<NodeIndex>> {
        let mut by_label: IndexMap<Arc<str>, (Category, Vec<NodeIndex>)> = IndexMap::new();
        for child in &group.nodes[parent].children {
            let node = &group.nodes[*child];
            let category = self.category(node);
            let label = category
                .folded_label()
                .map_or_else(|| node.label.clone(), Arc::from);
            by_label
                .entry(label)
                .or_insert_with(|| (category, Vec::new()))
                .1
                .push(*child);
        }
        if by_label.len() < 2 {
            return None;
        }

        let mut graph = DependencyGraph::with_nodes(by_label.keys().cloned());
        for (i, (_, (ca, a))) in by_label.iter().enumerate() {
            for (j, (_, (cb, b))) in by_label.iter().enumerate() {
                if i == j {
                    continue;
                }
                let (a, b) = (&group.nodes[a[0]], &group.nodes[b[0]]);
                if ca.precedes(*cb) || self.node_precedes(a, b) {
                    graph.add_edge(i, j);
                }
            }
        }

        match graph.topological_sort() {
            Ok(order) => Some(
                order
                    .into_iter()
                    .flat_map(|i| by_label[i].1.iter().copied())
                    .collect(),
            ),
            Err(cycle) => {
                let message = format!(
                    "overload {}::{} argument {}: type order cycle {}",
                    group.scope,
                    group.name,
                    group.nodes[group.nodes[parent].children[0]]
                        .position
                        .unwrap_or_default(),
                    graph.describe(&cycle.nodes)
                );
                diagnostics.warn(codes::OVERLOAD_ORDER_CYCLE, message);
                None
            }
        }
    }

    fn node_precedes(&self, a: &DecisionNode, b: &DecisionNode) -> bool {
        let replaced = |n: &DecisionNode| matches!(n.key, Some(ArgumentKey::Replaced(_)));
        if replaced(a) || replaced(b) {
            return false;
        }
        match (&a.ty, &b.ty) {
            (Some(a), Some(b)) => self.type_precedes(a, b),
            _ => false,
        }
    }

    /// Whether a sibling of type `a` must be checked before one of type `b`:
    /// `a` derives from `b`, `b` converts from `a`, or the same relation
    /// holds between instantiation arguments of the same container.
    fn type_precedes(&self, a: &MetaType, b: &MetaType) -> bool {
        if self.derives_from(a.entry, b.entry) || self.converts(a.entry, b.entry) {
            return true;
        }
        let instantiated = (a.is_container() || a.is_smart_pointer())
            && a.entry == b.entry
            && a.instantiations.len() == b.instantiations.len();
        instantiated
            && a.instantiations
                .iter()
                .zip(&b.instantiations)
                .any(|(x, y)| self.type_precedes(x, y))
    }
}
