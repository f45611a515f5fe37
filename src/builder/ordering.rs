//! Class emission ordering and the final validation pass.

use std::sync::Arc;

use super::MetaBuilder;
use crate::base::{ClassId, parent_scope, qualify};
use crate::diagnostics::{RejectCategory, RejectReason, codes};
use crate::graph::DependencyGraph;
use crate::typesystem::{CodeGeneration, EntryDetail, TypeEntryKind};

impl MetaBuilder<'_> {
    // ========================================================================
    // ORDERING
    // ========================================================================

    /// Graph over classes: enclosing before inner, base before derived, and
    /// the class of a default-constructed argument before the function's
    /// owner.
    fn class_dependency_graph(&self) -> DependencyGraph<Arc<str>> {
        let mut graph = DependencyGraph::with_nodes(self.model.classes().iter().map(|c| c.name.clone()));
        for class in self.model.classes() {
            let to = class.id.index();
            if let Some(enclosing) = class.enclosing {
                graph.add_edge(enclosing.index(), to);
            }
            for base in &class.bases {
                graph.add_edge(base.index(), to);
            }
            for function in self.model.functions_of(class.id) {
                for arg in &function.arguments {
                    let Some(default) = arg.default_value.as_deref() else {
                        continue;
                    };
                    if let Some(source) = self.default_constructed_class(default) {
                        graph.add_edge(source.index(), to);
                    }
                }
            }
        }
        graph
    }

    /// The class a default value such as `Color(0, 0, 0)` or `ns::Size{}`
    /// constructs, if any.
    fn default_constructed_class(&self, text: &str) -> Option<ClassId> {
        let text = text.trim();
        self.model.classes().iter().map(|c| c.id).find(|id| {
            let class = self.model.class(*id);
            !class.is_namespace()
                && [&*class.name, class.simple_name()].into_iter().any(|name| {
                    text.strip_prefix(name)
                        .is_some_and(|rest| rest.starts_with('(') || rest.starts_with('{'))
                })
        })
    }

    pub(super) fn order_classes(&mut self) {
        let graph = self.class_dependency_graph();
        tracing::debug!(
            "[BUILD] class graph: {} nodes, {} edges\n{}",
            graph.len(),
            graph.edge_count(),
            graph.to_dot("classes")
        );
        match graph.topological_sort() {
            Ok(order) => {
                self.model.class_order = order.into_iter().map(ClassId::new).collect();
            }
            Err(cycle) => {
                let message = format!("class dependency cycle: {}", graph.describe(&cycle.nodes));
                self.diagnostics.warn(codes::CLASS_ORDER_CYCLE, message);
                for node in &cycle.nodes {
                    self.diagnostics
                        .reject_class(graph.label(*node).to_string(), RejectReason::CyclicDependency);
                }
                self.model.class_order = self.model.classes().iter().map(|c| c.id).collect();
            }
        }
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    pub(super) fn validate(&mut self) {
        let mut warnings = Vec::new();
        let mut demoted = Vec::new();

        for (id, entry) in self.registry.iter() {
            if !entry.generates_code() {
                continue;
            }
            match entry.kind {
                kind if kind.is_complex() => {
                    if self.model.find_class(&entry.name).is_none()
                        && self
                            .diagnostics
                            .reason(RejectCategory::Class, &entry.name)
                            .is_none()
                    {
                        warnings.push(format!("type {} has no declaration", entry.name));
                    }
                }
                TypeEntryKind::Function => {
                    let EntryDetail::Function { signatures } = &entry.detail else {
                        continue;
                    };
                    let scope = parent_scope(&entry.name).unwrap_or("");
                    if signatures.is_empty() {
                        if !self.has_global_function(&entry.name, None) {
                            warnings.push(format!("function {} has no declaration", entry.name));
                        }
                        continue;
                    }
                    for signature in signatures {
                        let qualified = qualify(scope, signature);
                        if !self.has_global_function(&entry.name, Some(&qualified)) {
                            warnings.push(format!("function {qualified} has no declaration"));
                        }
                    }
                }
                TypeEntryKind::Enum => {
                    if self.model.find_enum(&entry.name).is_none() {
                        warnings.push(format!("enum {} has no declaration, disabling it", entry.name));
                        demoted.push(id);
                    }
                }
                _ => {}
            }
        }

        for message in warnings {
            self.diagnostics.warn(codes::UNMATCHED_SPECIFICATION, message);
        }
        for id in demoted {
            self.registry.get_mut(id).codegen = CodeGeneration::Disabled;
        }
    }

    /// Whether a built global function has the qualified `name`, and the
    /// qualified normalized `signature` when given.
    fn has_global_function(&self, name: &str, signature: Option<&str>) -> bool {
        self.model.global_functions().any(|f| {
            let qualified_name = f
                .original_signature
                .split_once('(')
                .map_or(f.original_signature.as_str(), |(head, _)| head);
            qualified_name == name && signature.is_none_or(|s| f.original_signature == s)
        })
    }
}
