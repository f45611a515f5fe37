//! Dependency graph with topological sorting.
//!
//! Nodes are dense integer indices carrying an opaque label used only for
//! diagnostics. An edge `a -> b` means "a must precede b". The graph is used
//! for class emission ordering and for overload sibling ordering.

use std::fmt::{self, Write as _};

use indexmap::IndexSet;
use thiserror::Error;

/// A topological sort hit a cycle.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("dependency cycle through {} node(s)", .nodes.len())]
pub struct GraphCycle {
    /// Nodes on the cycle, in edge order.
    pub nodes: Vec<usize>,
}

/// Directed graph over `0..len()` with labelled nodes.
#[derive(Clone, Debug)]
pub struct DependencyGraph<L> {
    labels: Vec<L>,
    successors: Vec<IndexSet<usize>>,
}

impl<L> Default for DependencyGraph<L> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            successors: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

impl<L> DependencyGraph<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with one node per label, in order.
    pub fn with_nodes(labels: impl IntoIterator<Item = L>) -> Self {
        let labels: Vec<L> = labels.into_iter().collect();
        let successors = labels.iter().map(|_| IndexSet::new()).collect();
        Self { labels, successors }
    }

    pub fn add_node(&mut self, label: L) -> usize {
        self.labels.push(label);
        self.successors.push(IndexSet::new());
        self.labels.len() - 1
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, node: usize) -> &L {
        &self.labels[node]
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Add `from -> to`. Self-loops are ignored.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        if from != to {
            self.successors[from].insert(to);
        }
    }

    pub fn remove_edge(&mut self, from: usize, to: usize) {
        self.successors[from].shift_remove(&to);
    }

    pub fn contains_edge(&self, from: usize, to: usize) -> bool {
        self.successors[from].contains(&to)
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(IndexSet::len).sum()
    }

    pub fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.successors[node].iter().copied()
    }

    /// Sort nodes so every edge points forward.
    ///
    /// Depth-first search producing reverse postorder, with an explicit
    /// stack. Roots and successors are visited in reverse so that unrelated
    /// nodes keep their insertion order.
    pub fn topological_sort(&self) -> Result<Vec<usize>, GraphCycle> {
        let n = self.labels.len();
        let mut marks = vec![Mark::Unvisited; n];
        let mut postorder = Vec::with_capacity(n);
        // (node, successors visited so far)
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in (0..n).rev() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::InProgress;
            stack.push((root, 0));

            while let Some(top) = stack.len().checked_sub(1) {
                let (node, cursor) = stack[top];
                let succ = &self.successors[node];
                if cursor < succ.len() {
                    let next = succ[succ.len() - 1 - cursor];
                    stack[top].1 += 1;
                    match marks[next] {
                        Mark::Unvisited => {
                            marks[next] = Mark::InProgress;
                            stack.push((next, 0));
                        }
                        Mark::InProgress => {
                            let start = stack
                                .iter()
                                .position(|(n, _)| *n == next)
                                .unwrap_or(0);
                            let nodes = stack[start..].iter().map(|(n, _)| *n).collect();
                            return Err(GraphCycle { nodes });
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node] = Mark::Done;
                    postorder.push(node);
                    stack.pop();
                }
            }
        }

        postorder.reverse();
        Ok(postorder)
    }
}

impl<L: fmt::Display> DependencyGraph<L> {
    /// Render the graph in Graphviz dot syntax.
    pub fn to_dot(&self, name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph \"{name}\" {{");
        for (i, label) in self.labels.iter().enumerate() {
            let text = label.to_string().replace('"', "\\\"");
            let _ = writeln!(out, "    n{i} [label=\"{text}\"];");
        }
        for (from, succ) in self.successors.iter().enumerate() {
            for to in succ {
                let _ = writeln!(out, "    n{from} -> n{to};");
            }
        }
        out.push_str("}\n");
        out
    }

    /// Labels of the given nodes joined with ` -> `, for cycle messages.
    pub fn describe(&self, nodes: &[usize]) -> String {
        let names: Vec<String> = nodes.iter().map(|n| self.labels[*n].to_string()).collect();
        names.join(" -> ")
    }
}
