//! Overload resolution.
//!
//! Every set of same-named, non-private functions sharing a declaring scope
//! becomes an [`OverloadGroup`]: a tree of [`DecisionNode`]s keyed by
//! argument position and argument type. Sibling nodes are sorted so that a
//! caller walking the tree checks the most specific type first (derived
//! before base, conversion source before conversion target, and the
//! precedence lists of [`PrecedenceRules`]).
//!
//! Groups are built from a frozen [`MetaModel`]; nothing here mutates the
//! model or the registry.

mod ordering;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::base::{ClassId, FunctionId, TypeEntryId};
use crate::config::PrecedenceRules;
use crate::decl::Access;
use crate::diagnostics::Diagnostics;
use crate::model::{FunctionKind, MetaArgument, MetaFunction, MetaModel, MetaType};
use crate::registry::TypeRegistry;
use crate::typesystem::TypeEntryKind;

/// Index of a node within its group. The root is always `0`.
pub type NodeIndex = usize;

const ROOT: NodeIndex = 0;

// ============================================================================
// DECISION TREE
// ============================================================================

/// Structural identity of an argument for overload purposes.
///
/// Qualifiers are ignored except that `char*` (a raw string) is distinct
/// from `char`. Container and smart pointer instantiations compare
/// recursively. A modification replacing the argument type keys the
/// argument by the replacement name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArgumentKey {
    Type {
        entry: TypeEntryId,
        is_cstring: bool,
        instantiations: Vec<ArgumentKey>,
    },
    Replaced(Arc<str>),
}

impl ArgumentKey {
    pub fn of(arg: &MetaArgument) -> Self {
        match &arg.replaced_type {
            Some(name) => ArgumentKey::Replaced(Arc::from(name.as_str())),
            None => Self::of_type(&arg.ty),
        }
    }

    pub fn of_type(ty: &MetaType) -> Self {
        ArgumentKey::Type {
            entry: ty.entry,
            is_cstring: ty.is_cstring(),
            instantiations: ty.instantiations.iter().map(Self::of_type).collect(),
        }
    }
}

fn type_label(ty: &MetaType) -> String {
    let mut label = ty.name.to_string();
    if !ty.instantiations.is_empty() {
        let args: Vec<String> = ty.instantiations.iter().map(type_label).collect();
        label.push('<');
        label.push_str(&args.join(","));
        label.push('>');
    }
    if ty.is_cstring() {
        label.push('*');
    }
    label
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecisionNode {
    /// Argument position this node checks; `None` for the root.
    pub position: Option<usize>,
    pub key: Option<ArgumentKey>,
    /// Type of the argument at this position, from the first candidate
    /// reaching the node.
    pub ty: Option<MetaType>,
    /// Human-readable type label (`QList<int>`, `char*`, or a replacement).
    pub label: Arc<str>,
    /// Candidates whose argument list passes through this node.
    pub candidates: Vec<FunctionId>,
    /// Child nodes, in check order once the group is built.
    pub children: Vec<NodeIndex>,
}

impl DecisionNode {
    fn root() -> Self {
        Self {
            position: None,
            key: None,
            ty: None,
            label: Arc::from(""),
            candidates: Vec::new(),
            children: Vec::new(),
        }
    }

    fn for_argument(position: usize, arg: &MetaArgument) -> Self {
        let label = match &arg.replaced_type {
            Some(name) => name.clone(),
            None => type_label(&arg.ty),
        };
        Self {
            position: Some(position),
            key: Some(ArgumentKey::of(arg)),
            ty: Some(arg.ty.clone()),
            label: Arc::from(label),
            candidates: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name used for precedence checks: the replacement type or the entry name.
    pub fn type_name(&self) -> &str {
        match (&self.key, &self.ty) {
            (Some(ArgumentKey::Replaced(name)), _) => name,
            (_, Some(ty)) => &ty.name,
            _ => "",
        }
    }

    pub fn is_root(&self) -> bool {
        self.position.is_none()
    }
}

/// Same-named candidates of one scope and their decision tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverloadGroup {
    pub name: Arc<str>,
    /// Qualified name of the declaring scope; empty for free functions.
    pub scope: Arc<str>,
    candidates: Vec<FunctionId>,
    /// (minimum, maximum) arity per candidate, parallel to `candidates`.
    arities: Vec<(usize, usize)>,
    nodes: Vec<DecisionNode>,
    min_args: usize,
    max_args: usize,
}

impl OverloadGroup {
    fn new(scope: Arc<str>, name: Arc<str>) -> Self {
        Self {
            name,
            scope,
            candidates: Vec::new(),
            arities: Vec::new(),
            nodes: vec![DecisionNode::root()],
            min_args: usize::MAX,
            max_args: 0,
        }
    }

    fn insert(&mut self, function: &MetaFunction) {
        self.candidates.push(function.id);
        self.arities.push((function.min_arity(), function.arity()));
        self.max_args = self.max_args.max(function.arity());
        self.min_args = self.min_args.min(function.arity());
        self.nodes[ROOT].candidates.push(function.id);

        let mut current = ROOT;
        for (position, arg) in function.arguments.iter().enumerate() {
            if arg.has_default() && position < self.min_args {
                self.min_args = position;
            }
            let key = ArgumentKey::of(arg);
            let existing = self.nodes[current]
                .children
                .iter()
                .copied()
                .find(|child| self.nodes[*child].key.as_ref() == Some(&key));
            let next = match existing {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(DecisionNode::for_argument(position, arg));
                    self.nodes[current].children.push(next);
                    next
                }
            };
            self.nodes[next].candidates.push(function.id);
            current = next;
        }
    }

    fn finish(&mut self) {
        if self.candidates.is_empty() {
            self.min_args = 0;
        }
        self.min_args = self.min_args.min(self.max_args);
    }

    pub fn min_args(&self) -> usize {
        self.min_args
    }

    pub fn max_args(&self) -> usize {
        self.max_args
    }

    pub fn candidates(&self) -> &[FunctionId] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The candidate standing for the whole group (its first declaration).
    pub fn representative(&self) -> Option<FunctionId> {
        self.candidates.first().copied()
    }

    pub fn is_overloaded(&self) -> bool {
        self.candidates.len() > 1
    }

    pub fn root(&self) -> &DecisionNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, index: NodeIndex) -> &DecisionNode {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[DecisionNode] {
        &self.nodes
    }

    /// Children of a node, in check order.
    pub fn children(&self, index: NodeIndex) -> impl Iterator<Item = &DecisionNode> {
        self.nodes[index].children.iter().map(|c| &self.nodes[*c])
    }

    /// Argument counts within `min_args..=max_args` that no candidate accepts.
    pub fn invalid_arg_counts(&self) -> Vec<usize> {
        (self.min_args..=self.max_args)
            .filter(|count| !self.arities.iter().any(|(min, max)| min <= count && count <= max))
            .collect()
    }

    /// Candidates with pure const/non-const twins merged, keeping the
    /// non-const function.
    pub fn unique_candidates(&self, model: &MetaModel) -> Vec<FunctionId> {
        let signature = |id: FunctionId| -> Vec<String> {
            model
                .function(id)
                .arguments
                .iter()
                .map(|a| a.ty.signature())
                .collect()
        };
        self.candidates
            .iter()
            .copied()
            .filter(|id| {
                if !model.function(*id).attributes.is_const {
                    return true;
                }
                let own = signature(*id);
                !self.candidates.iter().any(|other| {
                    other != id && !model.function(*other).attributes.is_const && signature(*other) == own
                })
            })
            .collect()
    }

    /// Whether `node` is the last node on `function`'s path through the tree.
    pub fn is_final_occurrence(&self, index: NodeIndex, function: FunctionId) -> bool {
        let node = &self.nodes[index];
        node.candidates.contains(&function)
            && !node
                .children
                .iter()
                .any(|c| self.nodes[*c].candidates.contains(&function))
    }

    /// Arity bounds of a candidate, if it belongs to the group.
    pub fn arity_of(&self, function: FunctionId) -> Option<(usize, usize)> {
        self.candidates
            .iter()
            .position(|c| *c == function)
            .map(|i| self.arities[i])
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Builds overload groups over a built model and answers call queries.
pub struct OverloadResolver<'a> {
    model: &'a MetaModel,
    registry: &'a TypeRegistry,
    rules: &'a PrecedenceRules,
}

impl<'a> OverloadResolver<'a> {
    pub fn new(model: &'a MetaModel, registry: &'a TypeRegistry, rules: &'a PrecedenceRules) -> Self {
        Self {
            model,
            registry,
            rules,
        }
    }

    /// One group per exposed function name of `class`, in order of first
    /// declaration.
    pub fn class_groups(&self, class: ClassId, diagnostics: &mut Diagnostics) -> Vec<OverloadGroup> {
        let scope = self.model.class(class).name.clone();
        self.groups(scope, self.model.functions_of(class), diagnostics)
    }

    /// One group per exposed free function name.
    pub fn global_groups(&self, diagnostics: &mut Diagnostics) -> Vec<OverloadGroup> {
        self.groups(Arc::from(""), self.model.global_functions(), diagnostics)
    }

    fn groups<'m>(
        &self,
        scope: Arc<str>,
        functions: impl Iterator<Item = &'m MetaFunction>,
        diagnostics: &mut Diagnostics,
    ) -> Vec<OverloadGroup> {
        let mut by_name: IndexMap<Arc<str>, Vec<FunctionId>> = IndexMap::new();
        for function in functions.filter(|f| f.access != Access::Private) {
            by_name.entry(function.name.clone()).or_default().push(function.id);
        }
        by_name
            .into_iter()
            .map(|(name, candidates)| self.group(scope.clone(), name, &candidates, diagnostics))
            .collect()
    }

    /// Build the decision tree for `candidates` and order its siblings.
    pub fn group(
        &self,
        scope: Arc<str>,
        name: Arc<str>,
        candidates: &[FunctionId],
        diagnostics: &mut Diagnostics,
    ) -> OverloadGroup {
        let mut group = OverloadGroup::new(scope, name);
        for id in candidates {
            group.insert(self.model.function(*id));
        }
        group.finish();
        self.order_siblings(&mut group, diagnostics);
        tracing::trace!(
            "[OVERLOAD] {}::{}: {} candidates, {}..={} args",
            group.scope,
            group.name,
            group.len(),
            group.min_args,
            group.max_args
        );
        group
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// The candidate a call with arguments of the given types resolves to,
    /// or `None` when nothing matches.
    pub fn select(&self, group: &OverloadGroup, arguments: &[TypeEntryId]) -> Option<FunctionId> {
        if group.is_empty() || arguments.len() < group.min_args || arguments.len() > group.max_args {
            return None;
        }
        let selected = self.select_from(group, ROOT, 0, arguments);
        tracing::trace!("[OVERLOAD] select {} with {} args -> {:?}", group.name, arguments.len(), selected);
        selected
    }

    fn select_from(
        &self,
        group: &OverloadGroup,
        node: NodeIndex,
        depth: usize,
        arguments: &[TypeEntryId],
    ) -> Option<FunctionId> {
        let current = &group.nodes[node];
        if depth == arguments.len() {
            let exact = current
                .candidates
                .iter()
                .copied()
                .find(|id| self.model.function(*id).arity() == depth);
            return exact.or_else(|| {
                current
                    .candidates
                    .iter()
                    .copied()
                    .find(|id| self.model.function(*id).min_arity() <= depth)
            });
        }
        let argument = arguments[depth];
        current
            .children
            .iter()
            .copied()
            .filter(|child| self.accepts(&group.nodes[*child], argument))
            .find_map(|child| self.select_from(group, child, depth + 1, arguments))
    }

    /// Whether a value of type `argument` can be passed where `node` checks.
    fn accepts(&self, node: &DecisionNode, argument: TypeEntryId) -> bool {
        let name = node.type_name();
        if self.rules.is_any_object(name) {
            return true;
        }
        match (&node.key, &node.ty) {
            (Some(ArgumentKey::Replaced(replaced)), _) => *self.registry.get(argument).name == **replaced,
            (_, Some(ty)) => {
                ty.entry == argument
                    || self.derives_from(argument, ty.entry)
                    || self.converts(argument, ty.entry)
                    || (self.registry.get(argument).kind == TypeEntryKind::Enum
                        && self.rules.is_integer(&ty.name))
            }
            _ => false,
        }
    }

    // ========================================================================
    // TYPE RELATIONS
    // ========================================================================

    /// Whether `derived`'s class inherits, directly or not, from `base`'s.
    fn derives_from(&self, derived: TypeEntryId, base: TypeEntryId) -> bool {
        if derived == base {
            return false;
        }
        match (self.model.class_by_entry(derived), self.model.class_by_entry(base)) {
            (Some(derived), Some(base)) => self.model.inherits_from(derived, base),
            _ => false,
        }
    }

    /// Whether `to` is implicitly constructible from `from`: a non-explicit
    /// single-argument constructor of `to`, a conversion operator of `from`,
    /// or a custom conversion rule of `to` naming `from`.
    fn converts(&self, from: TypeEntryId, to: TypeEntryId) -> bool {
        if from == to {
            return false;
        }
        if let Some(class) = self.model.class_by_entry(to) {
            let by_constructor = self.model.functions_of(class).any(|f| {
                f.is_implicit_conversion() && f.arguments.first().is_some_and(|a| a.ty.entry == from)
            });
            if by_constructor {
                return true;
            }
        }
        if let Some(class) = self.model.class_by_entry(from) {
            let by_operator = self.model.functions_of(class).any(|f| {
                f.kind == FunctionKind::ConversionOperator
                    && f.is_public()
                    && f.return_type.as_ref().is_some_and(|r| r.entry == to)
            });
            if by_operator {
                return true;
            }
        }
        let from_name = &self.registry.get(from).name;
        self.registry
            .get(to)
            .conversion_rule
            .as_ref()
            .is_some_and(|rule| rule.source_types().any(|source| source == &**from_name))
    }
}
