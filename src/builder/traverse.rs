//! Declaration traversal: type-producing declarations, then members.

use std::sync::Arc;

use super::{MemberScope, MetaBuilder};
use crate::base::{ClassId, TypeEntryId, qualify, simple_name};
use crate::decl::{
    Access, ClassDecl, EnumDecl, FieldDecl, FunctionDecl, Item, NamespaceDecl, ReferenceKind,
    TypedefDecl,
};
use crate::diagnostics::{RejectCategory, RejectReason, codes};
use crate::error::TypePosition;
use crate::model::{FunctionKind, MetaArgument, MetaEnum, MetaField, MetaFunction, evaluate_enum_values};
use crate::typesystem::{EntryDetail, FunctionModification, TypeEntry, TypeEntryKind};

impl<'a> MetaBuilder<'a> {
    // ========================================================================
    // TYPE-PRODUCING PASS
    // ========================================================================

    /// Visit classes, then enums, then namespaces, then typedefs of one scope.
    pub(super) fn traverse_items(&mut self, items: &'a [Item], scope: &str, enclosing: Option<ClassId>) {
        for item in items {
            if let Item::Class(decl) = item {
                self.traverse_class(decl, scope, enclosing);
            }
        }
        for item in items {
            if let Item::Enum(decl) = item {
                self.traverse_enum(decl, scope, enclosing);
            }
        }
        for item in items {
            if let Item::Namespace(decl) = item {
                self.traverse_namespace(decl, scope, enclosing);
            }
        }
        for item in items {
            if let Item::Typedef(decl) = item {
                self.traverse_typedef(decl, scope, enclosing);
            }
        }
    }

    /// Decide whether a declared class gets a MetaClass.
    fn admit_class(&self, qualified: &str) -> Result<TypeEntryId, RejectReason> {
        let all = self.registry.find_all(qualified);
        if all.is_empty() {
            return Err(RejectReason::NotInSpecification);
        }
        let complex: Vec<TypeEntryId> = all
            .iter()
            .copied()
            .filter(|id| self.registry.get(*id).is_complex())
            .collect();
        if complex.is_empty() {
            return Err(RejectReason::RedefinedToNonClass);
        }
        let Some(entry) = complex.iter().copied().find(|id| self.registry.is_usable(*id)) else {
            return Err(RejectReason::GenerationDisabled);
        };
        if let Some(reason) = self.registry.is_rejected(qualified, None) {
            return Err(reason);
        }
        Ok(entry)
    }

    fn create_class(&mut self, entry: TypeEntryId, qualified: &str, enclosing: Option<ClassId>) -> ClassId {
        let id = self.model.add_class(entry, qualified);
        let kind = self.registry.get(entry).kind;
        let class = self.model.class_mut(id);
        class.enclosing = enclosing;
        class.attributes.is_value_type = kind == TypeEntryKind::Value;
        class.attributes.is_namespace = kind == TypeEntryKind::Namespace;
        if let Some(parent) = enclosing {
            self.model.class_mut(parent).inner_classes.push(id);
        }
        tracing::trace!("[BUILD] class {} as {}", qualified, id);
        id
    }

    fn traverse_class(&mut self, decl: &'a ClassDecl, scope: &str, enclosing: Option<ClassId>) {
        let qualified = qualify(scope, &decl.name);
        if decl.access == Access::Private {
            return;
        }
        let entry = match self.admit_class(&qualified) {
            Ok(entry) => entry,
            Err(reason) => {
                self.diagnostics.reject_class(qualified, reason);
                return;
            }
        };

        let id = self.create_class(entry, &qualified, enclosing);
        let mut parameters = Vec::with_capacity(decl.template_parameters.len());
        for (ordinal, name) in decl.template_parameters.iter().enumerate() {
            parameters.push(self.registry.template_argument(&qualified, name, ordinal));
        }
        let class = self.model.class_mut(id);
        class.attributes.is_template = decl.is_template();
        class.attributes.is_final = decl.is_final;
        class.template_parameters = parameters;
        class.base_names = decl
            .bases
            .iter()
            .filter(|b| b.access != Access::Private)
            .map(|b| b.name.clone())
            .collect();

        self.class_decls.push((id, decl));
        self.member_scopes.push(MemberScope {
            owner: Some(id),
            scope: qualified.clone(),
            items: &decl.items,
        });
        self.traverse_items(&decl.items, &qualified, Some(id));
    }

    fn traverse_enum(&mut self, decl: &EnumDecl, scope: &str, enclosing: Option<ClassId>) {
        let qualified = qualify(scope, &decl.name);
        if decl.access == Access::Private {
            return;
        }
        let Some(entry) = self.registry.find_enum(&qualified) else {
            let reason = if self.registry.find_all(&qualified).is_empty() {
                RejectReason::NotInSpecification
            } else {
                RejectReason::GenerationDisabled
            };
            self.diagnostics.reject_enum(qualified, reason);
            return;
        };
        if let Some(reason) = self.registry.is_rejected(scope, Some(decl.name.as_str())) {
            self.diagnostics.reject_enum(qualified, reason);
            return;
        }

        let (values, failures) = evaluate_enum_values(decl);
        for name in failures {
            self.diagnostics.warn(
                codes::ENUM_VALUE,
                format!("cannot evaluate value of {}", qualify(&qualified, &name)),
            );
        }

        let flags = match &self.registry.get(entry).detail {
            EntryDetail::Enum { flags: Some(name) } => Some(name.clone()),
            _ => None,
        };
        let flags = flags.map(|name| match self.registry.find_flags(&name) {
            Some(id) => id,
            None => {
                let mut flags_entry = TypeEntry::new(TypeEntryKind::Flags, name.as_str());
                flags_entry.detail = EntryDetail::Flags {
                    enum_name: qualified.clone(),
                };
                self.registry.register(flags_entry)
            }
        });

        self.model.add_enum(MetaEnum {
            id: crate::base::EnumId::new(0),
            entry,
            name: Arc::from(qualified.as_str()),
            enclosing,
            values,
            is_scoped: decl.is_scoped,
            flags,
            access: decl.access,
        });
    }

    fn traverse_namespace(&mut self, decl: &'a NamespaceDecl, scope: &str, enclosing: Option<ClassId>) {
        let qualified = qualify(scope, &decl.name);
        let owner = if let Some(existing) = self.model.find_class(&qualified) {
            Some(existing)
        } else {
            match self.admit_class(&qualified) {
                Ok(entry) => Some(self.create_class(entry, &qualified, enclosing)),
                Err(RejectReason::NotInSpecification) => {
                    // Unspecified namespaces are transparent.
                    tracing::trace!("[BUILD] namespace {} not specified", qualified);
                    None
                }
                Err(reason) => {
                    self.diagnostics.reject_class(qualified, reason);
                    return;
                }
            }
        };

        self.member_scopes.push(MemberScope {
            owner,
            scope: qualified.clone(),
            items: &decl.items,
        });
        self.traverse_items(&decl.items, &qualified, owner.or(enclosing));
    }

    fn traverse_typedef(&mut self, decl: &TypedefDecl, scope: &str, enclosing: Option<ClassId>) {
        let qualified = qualify(scope, &decl.name);
        self.typedefs.insert(qualified.clone(), decl.target.clone());

        if !decl.target.has_instantiations() || self.registry.find_all(&qualified).is_empty() {
            return;
        }
        let entry = match self.admit_class(&qualified) {
            Ok(entry) => entry,
            Err(RejectReason::RedefinedToNonClass) => return,
            Err(reason) => {
                self.diagnostics.reject_class(qualified, reason);
                return;
            }
        };
        let id = self.create_class(entry, &qualified, enclosing);
        let class = self.model.class_mut(id);
        class.attributes.is_typedef = true;
        class.base_names = vec![decl.target.instantiated_name()];
    }

    // ========================================================================
    // MEMBER PASS
    // ========================================================================

    pub(super) fn traverse_members(&mut self) {
        let scopes = std::mem::take(&mut self.member_scopes);
        for member_scope in &scopes {
            for item in member_scope.items {
                match (item, member_scope.owner) {
                    (Item::Function(decl), Some(owner)) => {
                        if let Some(function) = self.build_function(decl, Some(owner), &member_scope.scope) {
                            self.model.add_function(function);
                        }
                    }
                    (Item::Function(decl), None) => {
                        self.free_functions.push((member_scope.scope.clone(), decl));
                    }
                    (Item::Field(decl), Some(owner)) => self.build_field(decl, owner),
                    _ => {}
                }
            }
        }
        self.member_scopes = scopes;
        tracing::debug!("[BUILD] members: {} functions", self.model.functions().len());
    }

    pub(super) fn traverse_free_functions(&mut self) {
        let functions = std::mem::take(&mut self.free_functions);
        for (scope, decl) in &functions {
            if decl.is_operator() && self.options.rehome_operators {
                if let Some(function) = self.build_function(decl, None, scope) {
                    let id = self.model.add_function(function);
                    self.operators.push(id);
                }
                continue;
            }

            let qualified = qualify(scope, &decl.name);
            let signature = qualify(scope, &decl.signature());
            let Some(entry) = self.registry.find_function(&qualified) else {
                let reason = if self.registry.find_all(&qualified).is_empty() {
                    RejectReason::NotInSpecification
                } else {
                    RejectReason::GenerationDisabled
                };
                self.diagnostics.reject_function(signature, reason);
                continue;
            };
            let accepted = match &self.registry.get(entry).detail {
                EntryDetail::Function { signatures } if !signatures.is_empty() => {
                    signatures.contains(&decl.signature())
                }
                _ => true,
            };
            if !accepted {
                self.diagnostics
                    .reject_function(signature, RejectReason::NotInSpecification);
                continue;
            }
            if let Some(function) = self.build_function(decl, None, scope) {
                self.model.add_function(function);
            }
        }
        self.free_functions = functions;
    }

    // ========================================================================
    // FUNCTIONS
    // ========================================================================

    /// Modifications that apply to a function of `owner` (or a free function).
    pub(super) fn modifications_for(&self, owner: Option<ClassId>, name: &str, signature: &str) -> Vec<FunctionModification> {
        let list: &[FunctionModification] = match owner {
            Some(class) => self
                .registry
                .get(self.model.class(class).entry)
                .complex()
                .map(|c| c.function_modifications.as_slice())
                .unwrap_or(&[]),
            None => &self.global_modifications,
        };
        list.iter()
            .filter(|m| m.matches(name, signature))
            .cloned()
            .collect()
    }

    /// Build one declared function, or record why it is dropped.
    pub(super) fn build_function(
        &mut self,
        decl: &FunctionDecl,
        owner: Option<ClassId>,
        scope: &str,
    ) -> Option<MetaFunction> {
        let class_name = owner
            .map(|c| self.model.class(c).name.to_string())
            .unwrap_or_default();
        let class_simple = owner.map(|c| self.model.class(c).simple_name().to_string());
        let signature = qualify(scope, &decl.signature());
        let kind = function_kind(decl, class_simple.as_deref());

        if let Some(class) = owner {
            let attributes = &mut self.model.class_mut(class).attributes;
            if decl.modifiers.is_abstract {
                attributes.is_abstract = true;
            }
            if decl.modifiers.is_virtual {
                attributes.is_polymorphic = true;
            }
            if kind.is_constructor() {
                attributes.has_user_constructors = true;
            }
            let private = decl.access == Access::Private;
            match kind {
                FunctionKind::Destructor if private => attributes.has_private_destructor = true,
                FunctionKind::CopyConstructor if decl.modifiers.is_deleted => {
                    attributes.has_deleted_copy_constructor = true
                }
                FunctionKind::CopyConstructor if private => {
                    attributes.has_private_copy_constructor = true;
                    attributes.has_private_constructor = true;
                }
                FunctionKind::Constructor | FunctionKind::MoveConstructor if private => {
                    attributes.has_private_constructor = true
                }
                _ => {}
            }
        }

        if decl.access == Access::Private || decl.modifiers.is_deleted {
            return None;
        }
        if kind == FunctionKind::Destructor {
            return None;
        }

        if let Some(reason) = self.registry.is_rejected(&class_name, Some(decl.name.as_str())) {
            self.diagnostics.reject_function(signature, reason);
            return None;
        }

        let modifications = self.modifications_for(owner, &decl.name, &decl.signature());
        if modifications.iter().any(|m| m.remove) {
            self.diagnostics
                .reject_function(signature, RejectReason::GenerationDisabled);
            return None;
        }

        let return_type = match &decl.return_type {
            Some(spec) => match self.resolve_type(spec, scope) {
                Ok(ty) => Some(ty),
                Err(err) => {
                    self.diagnostics.reject(
                        RejectCategory::Function,
                        signature,
                        err.reason(TypePosition::Return),
                        Some(err.to_string()),
                    );
                    return None;
                }
            },
            None => None,
        };

        let mut arguments = Vec::with_capacity(decl.arguments.len());
        for (index, arg) in decl.arguments.iter().enumerate() {
            let ty = match self.resolve_type(&arg.ty, scope) {
                Ok(ty) => ty,
                Err(err) => {
                    self.diagnostics.reject(
                        RejectCategory::Function,
                        signature,
                        err.reason(TypePosition::Argument),
                        Some(err.to_string()),
                    );
                    return None;
                }
            };
            let name = if arg.name.is_empty() {
                format!("arg__{}", index + 1)
            } else {
                arg.name.clone()
            };
            let mut meta = MetaArgument::new(name, ty, index);
            meta.default_value = arg.default_value.clone();
            meta.original_default_value = arg.default_value.clone();
            arguments.push(meta);
        }

        let mut function = MetaFunction::new(decl.name.as_str(), kind);
        function.owner = owner;
        function.declaring_class = owner;
        function.implementing_class = owner;
        function.arguments = arguments;
        function.return_type = return_type;
        function.access = decl.access;
        let m = decl.modifiers;
        function.attributes.is_static =
            m.is_static || owner.is_some_and(|c| self.model.class(c).is_namespace());
        function.attributes.is_virtual = m.is_virtual;
        function.attributes.is_abstract = m.is_abstract;
        function.attributes.is_const = m.is_const;
        function.attributes.is_override = m.is_override;
        function.attributes.is_final = m.is_final;
        function.attributes.is_explicit = m.is_explicit;
        function.original_signature = signature;
        apply_modifications(&mut function, modifications);
        Some(function)
    }

    // ========================================================================
    // FIELDS
    // ========================================================================

    pub(super) fn build_field(&mut self, decl: &FieldDecl, owner: ClassId) {
        if decl.access == Access::Private {
            return;
        }
        let class_name = self.model.class(owner).name.to_string();
        let signature = qualify(&class_name, &decl.name);
        if let Some(reason) = self.registry.is_rejected(&class_name, Some(decl.name.as_str())) {
            self.diagnostics.reject_field(signature, reason);
            return;
        }
        let modification = self
            .registry
            .get(self.model.class(owner).entry)
            .complex()
            .and_then(|c| c.field_modifications.iter().find(|m| m.name == decl.name))
            .cloned();
        if modification.as_ref().is_some_and(|m| m.remove) {
            self.diagnostics
                .reject_field(signature, RejectReason::GenerationDisabled);
            return;
        }

        let ty = match self.resolve_type(&decl.ty, &class_name) {
            Ok(ty) => ty,
            Err(err) => {
                self.diagnostics.reject(
                    RejectCategory::Field,
                    signature,
                    err.reason(TypePosition::Field),
                    Some(err.to_string()),
                );
                return;
            }
        };
        let original_name: Arc<str> = Arc::from(decl.name.as_str());
        let name = modification
            .as_ref()
            .and_then(|m| m.rename.as_deref())
            .map(Arc::from)
            .unwrap_or_else(|| original_name.clone());
        let field = MetaField {
            name,
            original_name,
            ty,
            access: decl.access,
            is_static: decl.is_static,
            enclosing: owner,
            is_read_only: modification.is_some_and(|m| m.read_only),
        };
        self.model.class_mut(owner).fields.push(field);
    }
}

/// Classify a declared function.
pub(super) fn function_kind(decl: &FunctionDecl, class_simple: Option<&str>) -> FunctionKind {
    let name = decl.name.as_str();
    if name.starts_with('~') {
        return FunctionKind::Destructor;
    }
    if decl.return_type.is_none() && class_simple == Some(name) {
        let first = decl.arguments.first();
        let rest_defaulted = decl.arguments.iter().skip(1).all(|a| a.default_value.is_some());
        if let (Some(first), true) = (first, rest_defaulted) {
            let same_class = simple_name(&first.ty.name) == name && first.ty.indirections == 0;
            if same_class {
                match first.ty.reference {
                    ReferenceKind::LValue => return FunctionKind::CopyConstructor,
                    ReferenceKind::RValue => return FunctionKind::MoveConstructor,
                    ReferenceKind::None => {}
                }
            }
        }
        return FunctionKind::Constructor;
    }
    if name == "operator=" {
        return FunctionKind::AssignmentOperator;
    }
    if let Some(rest) = name.strip_prefix("operator ") {
        if rest != "new" && rest != "delete" {
            return FunctionKind::ConversionOperator;
        }
    }
    if decl.is_operator() {
        return FunctionKind::Operator;
    }
    FunctionKind::Normal
}

/// Apply renames, access overrides and argument modifications.
pub(super) fn apply_modifications(function: &mut MetaFunction, modifications: Vec<FunctionModification>) {
    for modification in &modifications {
        if let Some(name) = &modification.rename {
            function.name = Arc::from(name.as_str());
        }
        if let Some(access) = modification.access {
            function.access = access;
        }
        for arg_mod in &modification.arguments {
            let Some(arg) = function.arguments.get_mut(arg_mod.index) else {
                continue;
            };
            if let Some(name) = &arg_mod.rename {
                arg.name = name.as_str().into();
            }
            if arg_mod.remove_default {
                arg.default_value = None;
            }
            if let Some(value) = &arg_mod.default_value {
                arg.default_value = Some(value.clone());
            }
            if let Some(ty) = &arg_mod.replace_type {
                arg.replaced_type = Some(ty.clone());
            }
            if arg_mod.ownership.is_some() {
                arg.ownership = arg_mod.ownership;
            }
        }
    }
    function.modifications = modifications;
}
