//! Type registry: the repository of resolvable named type entries.
//!
//! Populated from a [`BindingSpec`], the registry answers name lookups for the
//! builder. Several entries may share one qualified name; a plain lookup
//! returns the first *usable* one (not disabled, not a hidden primitive, not
//! newer than the configured API version).
//!
//! The builder is the only writer: it synthesizes constant, array and
//! template-argument entries on demand while resolving types. Entries are
//! never removed.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::base::{TypeEntryId, parent_scope, strip_template_args};
use crate::diagnostics::RejectReason;
use crate::error::{ResolveError, SpecError};
use crate::signature::normalize_signature;
use crate::typesystem::{
    ApiVersion, BindingSpec, EntryDetail, FunctionModification, Pattern, RejectRule, TypeEntry,
    TypeEntryKind,
};

/// Bound on primitive alias chains.
const MAX_ALIAS_DEPTH: usize = 16;

#[derive(Clone, Debug)]
struct CompiledRejection {
    class: Pattern,
    member: Option<Pattern>,
}

/// Repository of type entries keyed by qualified name.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    entries: Vec<TypeEntry>,
    by_name: FxHashMap<Arc<str>, Vec<TypeEntryId>>,
    constants: FxHashMap<i64, TypeEntryId>,
    arrays: FxHashMap<(TypeEntryId, Option<u64>), TypeEntryId>,
    rejections: Vec<CompiledRejection>,
    api_version: Option<ApiVersion>,
    void: TypeEntryId,
    varargs: TypeEntryId,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry holding only the `void` and `...` entries.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
            by_name: FxHashMap::default(),
            constants: FxHashMap::default(),
            arrays: FxHashMap::default(),
            rejections: Vec::new(),
            api_version: None,
            void: TypeEntryId::new(0),
            varargs: TypeEntryId::new(1),
        };
        registry.void = registry.register(TypeEntry::new(TypeEntryKind::Void, "void"));
        registry.varargs = registry.register(TypeEntry::new(TypeEntryKind::Varargs, "..."));
        registry
    }

    /// Build a registry from a specification.
    ///
    /// Modification and function signatures are normalized, rejection
    /// patterns compiled and typedef entries resolved against their sources.
    pub fn from_spec(spec: &BindingSpec) -> Result<Self, SpecError> {
        let mut registry = Self::new();
        for entry in &spec.entries {
            let mut entry = entry.clone();
            normalize_entry_signatures(&mut entry)?;
            registry.register(entry);
        }
        for rule in &spec.rejections {
            registry.add_rejection(rule)?;
        }

        let typedefs: Vec<TypeEntryId> = registry
            .iter()
            .filter(|(_, e)| e.kind == TypeEntryKind::Typedef)
            .map(|(id, _)| id)
            .collect();
        for id in typedefs {
            registry.resolve_typedef(id).map_err(|err| {
                SpecError::unknown("typedef source", format!("{} ({err})", registry.get(id).name))
            })?;
        }

        tracing::debug!(
            "[REGISTRY] {} entries, {} rejection rules",
            registry.entries.len(),
            registry.rejections.len()
        );
        Ok(registry)
    }

    /// Set the API version used to hide entries introduced later.
    pub fn with_api_version(mut self, version: Option<ApiVersion>) -> Self {
        self.api_version = version;
        self
    }

    pub fn api_version(&self) -> Option<ApiVersion> {
        self.api_version
    }

    // ========================================================================
    // REGISTRATION
    // ========================================================================

    /// Insert an entry under its qualified name. The owning scope is looked
    /// up from the name when not already set.
    pub fn register(&mut self, mut entry: TypeEntry) -> TypeEntryId {
        if entry.scope.is_none() {
            if let Some(parent) = parent_scope(&entry.name) {
                entry.scope = self.find_scope_entry(parent);
            }
        }
        let id = TypeEntryId::new(self.entries.len());
        tracing::trace!("[REGISTRY] register {} {} as {}", entry.kind, entry.name, id);
        self.by_name.entry(entry.name.clone()).or_default().push(id);
        self.entries.push(entry);
        id
    }

    pub fn add_rejection(&mut self, rule: &RejectRule) -> Result<(), SpecError> {
        let member = match &rule.member {
            Some(m) => Some(Pattern::new(m)?),
            None => None,
        };
        self.rejections.push(CompiledRejection {
            class: Pattern::new(&rule.class)?,
            member,
        });
        Ok(())
    }

    fn find_scope_entry(&self, scope: &str) -> Option<TypeEntryId> {
        self.find_all(scope)
            .iter()
            .copied()
            .find(|id| self.get(*id).is_complex())
    }

    // ========================================================================
    // ACCESS
    // ========================================================================

    pub fn get(&self, id: TypeEntryId) -> &TypeEntry {
        &self.entries[id.index()]
    }

    pub fn get_mut(&mut self, id: TypeEntryId) -> &mut TypeEntry {
        &mut self.entries[id.index()]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeEntryId, &TypeEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (TypeEntryId::new(i), e))
    }

    pub fn void(&self) -> TypeEntryId {
        self.void
    }

    pub fn varargs(&self) -> TypeEntryId {
        self.varargs
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Whether lookups may return this entry.
    pub fn is_usable(&self, id: TypeEntryId) -> bool {
        let entry = self.get(id);
        entry.is_usable() && !self.is_newer_than_api(entry)
    }

    /// Whether the entry was introduced after the configured API version.
    pub fn is_newer_than_api(&self, entry: &TypeEntry) -> bool {
        match (entry.since, self.api_version) {
            (Some(since), Some(api)) => since > api,
            _ => false,
        }
    }

    /// All entries registered under `name`, usable or not.
    pub fn find_all(&self, name: &str) -> &[TypeEntryId] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First usable entry registered under `name`.
    pub fn find(&self, name: &str) -> Option<TypeEntryId> {
        self.find_all(name)
            .iter()
            .copied()
            .find(|id| self.is_usable(*id))
    }

    fn find_kind(&self, name: &str, pred: impl Fn(&TypeEntry) -> bool) -> Option<TypeEntryId> {
        self.find_all(name)
            .iter()
            .copied()
            .find(|id| self.is_usable(*id) && pred(self.get(*id)))
    }

    pub fn find_primitive(&self, name: &str) -> Option<TypeEntryId> {
        self.find_kind(name, |e| e.kind == TypeEntryKind::Primitive)
    }

    /// Container lookup by template name; instantiation arguments are ignored.
    pub fn find_container(&self, name: &str) -> Option<TypeEntryId> {
        self.find_kind(strip_template_args(name), |e| {
            e.kind == TypeEntryKind::Container
        })
    }

    pub fn find_smart_pointer(&self, name: &str) -> Option<TypeEntryId> {
        self.find_kind(strip_template_args(name), |e| {
            e.kind == TypeEntryKind::SmartPointer
        })
    }

    pub fn find_flags(&self, name: &str) -> Option<TypeEntryId> {
        self.find_kind(name, |e| e.kind == TypeEntryKind::Flags)
    }

    pub fn find_namespace(&self, name: &str) -> Option<TypeEntryId> {
        self.find_kind(name, |e| e.kind == TypeEntryKind::Namespace)
    }

    pub fn find_enum(&self, name: &str) -> Option<TypeEntryId> {
        self.find_kind(name, |e| e.kind == TypeEntryKind::Enum)
    }

    /// Value, object or namespace entry.
    pub fn find_complex(&self, name: &str) -> Option<TypeEntryId> {
        self.find_kind(name, TypeEntry::is_complex)
    }

    pub fn find_function(&self, name: &str) -> Option<TypeEntryId> {
        self.find_kind(name, |e| e.kind == TypeEntryKind::Function)
    }

    /// Entry for a type reference by exact name.
    ///
    /// Typedef entries are skipped (their resolved clones stand in for
    /// them). Several usable matches are accepted only when they share a
    /// kind; the first is returned.
    pub fn lookup_type(&self, name: &str) -> Result<Option<TypeEntryId>, ResolveError> {
        let mut candidates = self.find_all(name).iter().copied().filter(|id| {
            self.is_usable(*id)
                && !matches!(
                    self.get(*id).kind,
                    TypeEntryKind::Typedef | TypeEntryKind::Function
                )
        });
        let Some(first) = candidates.next() else {
            return Ok(None);
        };
        let kind = self.get(first).kind;
        let others: Vec<TypeEntryId> = candidates.filter(|id| self.get(*id).kind != kind).collect();
        if others.is_empty() {
            return Ok(Some(first));
        }
        let mut kinds = vec![kind.as_str()];
        kinds.extend(others.iter().map(|id| self.get(*id).kind.as_str()));
        Err(ResolveError::Ambiguous {
            name: name.to_string(),
            kinds: kinds.join(", "),
        })
    }

    // ========================================================================
    // REJECTIONS
    // ========================================================================

    /// Whether the specification rejects a class (`member == None`) or a
    /// member of a class. Global members use an empty class name.
    pub fn is_rejected(&self, class_name: &str, member: Option<&str>) -> Option<RejectReason> {
        let hit = self.rejections.iter().any(|rule| {
            if !rule.class.matches(class_name) {
                return false;
            }
            match (&rule.member, member) {
                (None, None) => true,
                (Some(pattern), Some(name)) => pattern.matches(name),
                _ => false,
            }
        });
        if hit {
            tracing::trace!("[REGISTRY] rejected {}::{:?}", class_name, member);
            Some(RejectReason::GenerationDisabled)
        } else {
            None
        }
    }

    // ========================================================================
    // SYNTHESIZED ENTRIES
    // ========================================================================

    /// Resolve a typedef entry by cloning its source complex entry under the
    /// typedef's name. Repeated calls return the same clone.
    pub fn resolve_typedef(&mut self, id: TypeEntryId) -> Result<TypeEntryId, ResolveError> {
        let entry = self.get(id);
        let EntryDetail::Typedef { source } = &entry.detail else {
            return Ok(id);
        };
        let name = entry.name.clone();
        if let Some(existing) = self
            .find_all(&name)
            .iter()
            .copied()
            .find(|other| self.get(*other).typedef_of.is_some())
        {
            return Ok(existing);
        }

        let source_name = strip_template_args(source).to_string();
        let source_id = self
            .find_complex(&source_name)
            .or_else(|| {
                // A typedef declared inside a namespace may name its source relatively.
                parent_scope(&name).and_then(|scope| {
                    self.find_complex(&crate::base::qualify(scope, &source_name))
                })
            })
            .ok_or_else(|| ResolveError::Typedef(name.to_string()))?;

        let mut clone = self.get(source_id).clone();
        clone.name = name;
        clone.scope = None;
        clone.typedef_of = Some(source_id);
        clone.codegen = self.get(id).codegen;
        clone.include = self.get(id).include.clone().or(clone.include);
        if self.get(id).since.is_some() {
            clone.since = self.get(id).since;
        }
        let clone_id = self.register(clone);
        tracing::trace!("[REGISTRY] typedef {} -> {}", clone_id, source_id);
        Ok(clone_id)
    }

    /// Interned Constant entry for a numeric template argument.
    pub fn constant(&mut self, value: i64) -> TypeEntryId {
        if let Some(id) = self.constants.get(&value) {
            return *id;
        }
        let mut entry = TypeEntry::new(TypeEntryKind::Constant, value.to_string());
        entry.detail = EntryDetail::Constant { value };
        let id = self.register(entry);
        self.constants.insert(value, id);
        id
    }

    /// Interned Array entry for one dimension over `element`.
    pub fn array(&mut self, element: TypeEntryId, count: Option<u64>) -> TypeEntryId {
        if let Some(id) = self.arrays.get(&(element, count)) {
            return *id;
        }
        let name = match count {
            Some(n) => format!("{}[{}]", self.get(element).name, n),
            None => format!("{}[]", self.get(element).name),
        };
        let mut entry = TypeEntry::new(TypeEntryKind::Array, name);
        entry.detail = EntryDetail::Array { element, count };
        let id = self.register(entry);
        self.arrays.insert((element, count), id);
        id
    }

    /// TemplateArgument entry for parameter `ordinal` of the template
    /// `template_name`, registered as `template_name::parameter`.
    pub fn template_argument(
        &mut self,
        template_name: &str,
        parameter: &str,
        ordinal: usize,
    ) -> TypeEntryId {
        let name = crate::base::qualify(template_name, parameter);
        if let Some(id) = self
            .find_all(&name)
            .iter()
            .copied()
            .find(|id| self.get(*id).kind == TypeEntryKind::TemplateArgument)
        {
            return id;
        }
        let mut entry = TypeEntry::new(TypeEntryKind::TemplateArgument, name);
        entry.detail = EntryDetail::TemplateArgument { ordinal };
        self.register(entry)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Follow a primitive's alias chain to the primitive it ultimately names.
    pub fn basic_aliased_primitive(&self, id: TypeEntryId) -> TypeEntryId {
        let mut current = id;
        for _ in 0..MAX_ALIAS_DEPTH {
            let Some(target) = self.get(current).aliased_primitive() else {
                break;
            };
            let next = self
                .find_all(target)
                .iter()
                .copied()
                .find(|t| self.get(*t).is_primitive());
            match next {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }

    /// Whether a smart pointer entry may point to `pointee`.
    pub fn accepts_pointee(&self, smart_pointer: TypeEntryId, pointee: &str) -> bool {
        match &self.get(smart_pointer).detail {
            EntryDetail::SmartPointer { instantiations, .. } => {
                instantiations.is_empty() || instantiations.iter().any(|i| i == pointee)
            }
            _ => false,
        }
    }
}

fn normalize_modifications(list: &mut [FunctionModification]) -> Result<(), SpecError> {
    for modification in list.iter_mut().filter(|m| !m.is_name_only()) {
        modification.signature = normalize_signature(&modification.signature)
            .map_err(|e| SpecError::signature(modification.signature.clone(), e))?;
    }
    Ok(())
}

fn normalize_entry_signatures(entry: &mut TypeEntry) -> Result<(), SpecError> {
    match &mut entry.detail {
        EntryDetail::Complex(detail) => normalize_modifications(&mut detail.function_modifications),
        EntryDetail::Function { signatures } => {
            for signature in signatures.iter_mut() {
                *signature = normalize_signature(signature)
                    .map_err(|e| SpecError::signature(signature.clone(), e))?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Normalize global modification signatures in place.
pub(crate) fn normalize_global_modifications(
    modifications: &[FunctionModification],
) -> Result<Vec<FunctionModification>, SpecError> {
    let mut list = modifications.to_vec();
    normalize_modifications(&mut list)?;
    Ok(list)
}

#[cfg(test)]
mod tests;
