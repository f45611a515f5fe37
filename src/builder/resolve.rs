//! Type resolution against the registry.
//!
//! A raw [`TypeSpec`] is resolved in a lexical scope by walking the scope
//! chain outward (current class, enclosing scopes, global). Template
//! parameters visible in a scope win over other entries of that scope.
//! Unresolved names are retried through declared typedefs, up to a fixed
//! depth.

use super::{MAX_TYPEDEF_DEPTH, MetaBuilder};
use crate::base::{TypeEntryId, parent_scope, qualify, scope_chain, simple_name};
use crate::decl::{ArrayDim, ReferenceKind, TypeSpec};
use crate::error::ResolveError;
use crate::model::{MetaType, parse_integer_literal};
use crate::typesystem::{EntryDetail, TypeEntryKind};

impl<'a> MetaBuilder<'a> {
    /// Resolve a type reference in `scope`.
    pub(super) fn resolve_type(&mut self, spec: &TypeSpec, scope: &str) -> Result<MetaType, ResolveError> {
        self.resolve_at_depth(spec, scope, 0)
    }

    /// `depth` counts typedefs already expanded on the way to `spec`.
    fn resolve_at_depth(&mut self, spec: &TypeSpec, scope: &str, depth: usize) -> Result<MetaType, ResolveError> {
        tracing::trace!("[RESOLVE] {} in '{}'", spec, scope);
        match spec.array_dims.as_slice() {
            [] => self.resolve_plain(spec, scope, depth),
            // `T[]` decays to `T*`.
            [ArrayDim::Unspecified] => {
                let mut element = spec.element();
                element.indirections += 1;
                self.resolve_plain(&element, scope, depth)
            }
            dims => {
                let mut current = self.resolve_plain(&spec.element(), scope, depth)?;
                for dim in dims.iter().rev() {
                    let count = match dim {
                        ArrayDim::Unspecified => None,
                        ArrayDim::Sized(text) => Some(self.array_count(text, scope)?),
                    };
                    let entry = self.registry.array(current.entry, count);
                    let mut wrapped = MetaType::from_entry(self.registry, entry);
                    wrapped.array_element = Some(Box::new(current));
                    wrapped.array_count = count;
                    current = wrapped;
                }
                current.original = spec.to_string();
                Ok(current)
            }
        }
    }

    /// Resolve a reference without array dimensions, following typedefs.
    fn resolve_plain(&mut self, spec: &TypeSpec, scope: &str, depth: usize) -> Result<MetaType, ResolveError> {
        let mut current = spec.clone();
        let mut current_scope = scope.to_string();
        for expanded in depth..=MAX_TYPEDEF_DEPTH {
            if !current.array_dims.is_empty() {
                // A typedef to an array type: resolve the dimensions too.
                let mut ty = self.resolve_at_depth(&current, &current_scope, expanded)?;
                ty.original = spec.to_string();
                return Ok(ty);
            }
            if let Some(entry) = self.lookup_name(&current.name, &current_scope)? {
                let mut ty = self.finish_type(&current, entry, &current_scope)?;
                ty.original = spec.to_string();
                return Ok(ty);
            }
            let Some((qualified, target)) = self.find_typedef(&current.name, &current_scope) else {
                tracing::trace!("[RESOLVE] {} not found", spec);
                return Err(ResolveError::NotFound(spec.to_string()));
            };
            tracing::trace!("[RESOLVE] typedef {} -> {}", qualified, target);
            current = expand_typedef(target, &current);
            current_scope = parent_scope(&qualified).unwrap_or("").to_string();
        }
        Err(ResolveError::Typedef(spec.name.clone()))
    }

    /// Find the entry a name refers to from `scope`.
    pub(super) fn lookup_name(&self, name: &str, scope: &str) -> Result<Option<TypeEntryId>, ResolveError> {
        for s in scope_chain(scope) {
            let candidate = qualify(s, name);
            let template_argument = self
                .registry
                .find_all(&candidate)
                .iter()
                .copied()
                .find(|id| self.registry.get(*id).kind == TypeEntryKind::TemplateArgument);
            if template_argument.is_some() {
                return Ok(template_argument);
            }
            if let Some(id) = self.registry.lookup_type(&candidate)? {
                tracing::trace!("[RESOLVE] {} -> {}", candidate, id);
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    fn find_typedef(&self, name: &str, scope: &str) -> Option<(String, TypeSpec)> {
        scope_chain(scope).find_map(|s| {
            let candidate = qualify(s, name);
            self.typedefs
                .get(&candidate)
                .map(|target| (candidate, target.clone()))
        })
    }

    /// Apply qualifiers and resolve instantiation arguments.
    fn finish_type(
        &mut self,
        spec: &TypeSpec,
        entry: TypeEntryId,
        scope: &str,
    ) -> Result<MetaType, ResolveError> {
        let kind = self.registry.get(entry).kind;
        let mut entry = entry;

        let mut instantiations = Vec::with_capacity(spec.instantiations.len());
        for arg in &spec.instantiations {
            instantiations.push(self.resolve_template_argument(arg, scope)?);
        }

        match kind {
            TypeEntryKind::SmartPointer => {
                entry = self.match_smart_pointer(&spec.name, entry, &instantiations)?;
            }
            TypeEntryKind::Container if !instantiations.is_empty() => {
                if let Some(container) = self.registry.get(entry).container_kind() {
                    if container.arity() != instantiations.len() {
                        return Err(ResolveError::TemplateArity {
                            name: spec.name.clone(),
                            expected: container.arity(),
                            found: instantiations.len(),
                        });
                    }
                }
            }
            _ => {}
        }

        let mut ty = MetaType::from_entry(self.registry, entry).with_qualifiers(
            spec.is_const,
            spec.indirections,
            spec.reference,
        );
        ty.is_volatile = spec.is_volatile;
        ty.instantiations = instantiations;
        Ok(ty)
    }

    /// A template argument is a type or a non-type numeric constant.
    pub(super) fn resolve_template_argument(
        &mut self,
        arg: &TypeSpec,
        scope: &str,
    ) -> Result<MetaType, ResolveError> {
        if arg.is_numeric_literal() {
            let value = parse_signed_literal(&arg.name)
                .ok_or_else(|| ResolveError::NotFound(arg.name.clone()))?;
            let entry = self.registry.constant(value);
            return Ok(MetaType::from_entry(self.registry, entry));
        }
        self.resolve_type(arg, scope)
    }

    /// Pick the smart pointer entry whose constraint accepts the pointee.
    fn match_smart_pointer(
        &self,
        name: &str,
        found: TypeEntryId,
        instantiations: &[MetaType],
    ) -> Result<TypeEntryId, ResolveError> {
        let [pointee] = instantiations else {
            return Err(ResolveError::smart_pointer(
                name,
                format!("expected 1 instantiation, got {}", instantiations.len()),
            ));
        };
        let entry_name = self.registry.get(found).name.clone();
        self.registry
            .find_all(&entry_name)
            .iter()
            .copied()
            .filter(|id| {
                self.registry.is_usable(*id)
                    && matches!(self.registry.get(*id).detail, EntryDetail::SmartPointer { .. })
            })
            .find(|id| self.registry.accepts_pointee(*id, &pointee.name))
            .ok_or_else(|| {
                ResolveError::smart_pointer(name, format!("`{}` is not an accepted pointee", pointee.name))
            })
    }

    /// Element count of an array dimension: a literal or a known enumerator.
    fn array_count(&self, text: &str, scope: &str) -> Result<u64, ResolveError> {
        if let Some(n) = parse_integer_literal(text.trim()) {
            return u64::try_from(n).map_err(|_| ResolveError::ArrayDimension(text.to_string()));
        }
        let wanted = simple_name(text.trim());
        let enum_scope = parent_scope(text.trim());
        for s in scope_chain(scope) {
            for meta_enum in self.model.enums() {
                let owner_scope = parent_scope(&meta_enum.name).unwrap_or("");
                let visible = match enum_scope {
                    Some(explicit) => qualify(s, explicit) == *meta_enum.name
                        || qualify(s, explicit) == owner_scope,
                    None => owner_scope == s && !meta_enum.is_scoped,
                };
                if !visible {
                    continue;
                }
                if let Some(value) = meta_enum.value(wanted) {
                    return u64::try_from(value)
                        .map_err(|_| ResolveError::ArrayDimension(text.to_string()));
                }
            }
        }
        Err(ResolveError::ArrayDimension(text.to_string()))
    }
}

/// Replace a typedef name by its target, keeping the outer qualifiers.
fn expand_typedef(mut target: TypeSpec, outer: &TypeSpec) -> TypeSpec {
    target.is_const |= outer.is_const;
    target.is_volatile |= outer.is_volatile;
    target.indirections = target.indirections.saturating_add(outer.indirections);
    if outer.reference != ReferenceKind::None {
        target.reference = outer.reference;
    }
    target.array_dims.extend(outer.array_dims.iter().cloned());
    target
}

fn parse_signed_literal(text: &str) -> Option<i64> {
    match text.strip_prefix('-') {
        Some(rest) => parse_integer_literal(rest).map(i64::wrapping_neg),
        None => parse_integer_literal(text),
    }
}
