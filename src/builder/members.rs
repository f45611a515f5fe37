//! Specification-added functions, synthesized special members and
//! capability flags.

use super::MetaBuilder;
use super::traverse::function_kind;
use crate::base::{ClassId, qualify};
use crate::decl::{Access, FunctionDecl, ReferenceKind};
use crate::error::{BuildError, ResolveError};
use crate::model::{FunctionKind, MetaArgument, MetaFunction, MetaType};
use crate::typesystem::AddedFunction;

impl MetaBuilder<'_> {
    // ========================================================================
    // ADDED FUNCTIONS
    // ========================================================================

    pub(super) fn add_specified_functions(&mut self) -> Result<(), BuildError> {
        let ids: Vec<ClassId> = self.model.classes().iter().map(|c| c.id).collect();
        for id in ids {
            let added = self
                .registry
                .get(self.model.class(id).entry)
                .complex()
                .map(|c| c.added_functions.clone())
                .unwrap_or_default();
            for function in &added {
                let built = self.build_added_function(function, Some(id))?;
                self.model.add_function(built);
            }
        }
        let spec = self.spec;
        for function in &spec.global_added_functions {
            let built = self.build_added_function(function, None)?;
            self.model.add_function(built);
        }
        Ok(())
    }

    fn build_added_function(
        &mut self,
        added: &AddedFunction,
        owner: Option<ClassId>,
    ) -> Result<MetaFunction, BuildError> {
        let scope = owner
            .map(|c| self.model.class(c).name.to_string())
            .unwrap_or_default();
        let fail = |source: ResolveError| BuildError::AddedFunction {
            scope: scope.clone(),
            signature: added.signature.clone(),
            source,
        };

        let decl = FunctionDecl::parse(&added.signature).map_err(|e| fail(e.into()))?;
        let class_simple = owner.map(|c| self.model.class(c).simple_name().to_string());
        let kind = function_kind(&decl, class_simple.as_deref());

        let return_type = match &decl.return_type {
            Some(spec) if !kind.is_constructor() => Some(self.resolve_type(spec, &scope).map_err(fail)?),
            _ => None,
        };
        let mut arguments = Vec::with_capacity(decl.arguments.len());
        for (index, arg) in decl.arguments.iter().enumerate() {
            let ty = self.resolve_type(&arg.ty, &scope).map_err(fail)?;
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
        function.return_type = return_type;
        function.arguments = arguments;
        function.access = added.access;
        function.attributes.is_const = decl.modifiers.is_const;
        function.attributes.is_static = added.is_static
            || decl.modifiers.is_static
            || owner.is_some_and(|c| self.model.class(c).is_namespace());
        function.attributes.is_user_added = true;
        function.original_signature = qualify(&scope, &decl.signature());
        tracing::trace!("[BUILD] added function {}", function.original_signature);
        Ok(function)
    }

    // ========================================================================
    // SPECIAL MEMBERS
    // ========================================================================

    pub(super) fn add_special_members(&mut self) {
        let ids: Vec<ClassId> = self.model.classes().iter().map(|c| c.id).collect();
        for id in ids {
            let class = self.model.class(id);
            if class.is_namespace() || class.is_template() {
                continue;
            }
            if self.options.generate_default_constructors && self.needs_default_constructor(id) {
                self.add_default_constructor(id);
            }
            if self.options.generate_copy_constructors && self.needs_copy_constructor(id) {
                self.add_copy_constructor(id);
            }
        }
    }

    fn needs_default_constructor(&self, id: ClassId) -> bool {
        let class = self.model.class(id);
        if class.attributes.has_user_constructors {
            return false;
        }
        if self.model.functions_of(id).any(|f| f.is_constructor()) {
            return false;
        }
        self.registry
            .is_rejected(&class.name, Some(class.simple_name()))
            .is_none()
    }

    fn add_default_constructor(&mut self, id: ClassId) {
        let class = self.model.class(id);
        let simple = class.simple_name().to_string();
        let mut function = MetaFunction::new(simple.as_str(), FunctionKind::Constructor);
        function.original_signature = qualify(&class.name, &format!("{simple}()"));
        self.add_synthesized(id, function);
    }

    fn needs_copy_constructor(&self, id: ClassId) -> bool {
        let class = self.model.class(id);
        class.attributes.is_value_type
            && !class.attributes.has_private_copy_constructor
            && !class.attributes.has_deleted_copy_constructor
            && !self
                .model
                .functions_of(id)
                .any(|f| f.kind == FunctionKind::CopyConstructor)
    }

    fn add_copy_constructor(&mut self, id: ClassId) {
        let class = self.model.class(id);
        let simple = class.simple_name().to_string();
        let ty = MetaType::from_entry(self.registry, class.entry).with_qualifiers(
            true,
            0,
            ReferenceKind::LValue,
        );
        let mut function = MetaFunction::new(simple.as_str(), FunctionKind::CopyConstructor);
        function.original_signature = qualify(&class.name, &format!("{simple}(const {simple}&)"));
        function.arguments.push(MetaArgument::new("other", ty, 0));
        if self.ancestor_blocks_copy(id) {
            function.access = Access::Private;
        }
        self.add_synthesized(id, function);
    }

    fn add_synthesized(&mut self, id: ClassId, mut function: MetaFunction) {
        function.owner = Some(id);
        function.declaring_class = Some(id);
        function.implementing_class = Some(id);
        function.attributes.is_synthesized = true;
        tracing::trace!("[BUILD] synthesized {}", function.original_signature);
        self.model.add_function(function);
    }

    /// Whether an ancestor (or an ancestor of the template base) has a
    /// non-public or deleted copy constructor.
    fn ancestor_blocks_copy(&self, id: ClassId) -> bool {
        let mut scan = self.model.ancestors(id);
        if let Some(template) = self.model.class(id).template_base {
            scan.push(template);
            scan.extend(self.model.ancestors(template));
        }
        scan.into_iter().any(|ancestor| {
            let attributes = &self.model.class(ancestor).attributes;
            attributes.has_private_copy_constructor
                || attributes.has_deleted_copy_constructor
                || self
                    .model
                    .functions_of(ancestor)
                    .any(|f| f.kind == FunctionKind::CopyConstructor && !f.is_public())
        })
    }

    // ========================================================================
    // CAPABILITIES
    // ========================================================================

    pub(super) fn compute_capabilities(&mut self) {
        let ids: Vec<ClassId> = self.model.classes().iter().map(|c| c.id).collect();

        let polymorphic: Vec<bool> = ids
            .iter()
            .map(|id| {
                self.model.class(*id).attributes.is_polymorphic
                    || self
                        .model
                        .ancestors(*id)
                        .into_iter()
                        .any(|a| self.model.class(a).attributes.is_polymorphic)
            })
            .collect();

        for (id, is_polymorphic) in ids.iter().copied().zip(polymorphic) {
            let has_equality = self
                .model
                .functions_of(id)
                .any(|f| &*f.original_name == "operator==");
            let has_public_ctor = self
                .model
                .functions_of(id)
                .any(|f| f.is_constructor() && f.is_public());
            let has_public_copy = self
                .model
                .functions_of(id)
                .any(|f| f.kind == FunctionKind::CopyConstructor && f.is_public());
            let blocks_copy = self.ancestor_blocks_copy(id);
            let entry = self.registry.get(self.model.class(id).entry);
            let hash_function = entry.complex().is_some_and(|c| c.hash_function.is_some());
            let copyable = entry.complex().and_then(|c| c.copyable);

            let attributes = &mut self.model.class_mut(id).attributes;
            attributes.is_polymorphic = is_polymorphic;
            attributes.has_equality = has_equality;
            attributes.is_hashable = hash_function || has_equality;
            attributes.is_destructible = !attributes.has_private_destructor;
            attributes.is_constructible = !attributes.is_namespace
                && !attributes.is_abstract
                && (has_public_ctor || !attributes.has_user_constructors);
            let detected = attributes.is_value_type
                && !attributes.is_abstract
                && (has_public_copy
                    || (!attributes.has_private_copy_constructor
                        && !attributes.has_deleted_copy_constructor
                        && !blocks_copy));
            attributes.is_clonable = copyable.unwrap_or(detected);
        }

        // Instantiations carry the template's capabilities.
        for id in ids {
            let Some(template) = self.model.class(id).template_base else {
                continue;
            };
            let from = self.model.class(template).attributes.clone();
            let attributes = &mut self.model.class_mut(id).attributes;
            attributes.is_clonable = from.is_clonable;
            attributes.is_hashable = from.is_hashable;
            attributes.has_equality = from.has_equality;
            attributes.is_constructible = from.is_constructible;
            attributes.is_destructible = from.is_destructible;
        }
    }
}
