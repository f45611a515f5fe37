//! Base class resolution and template inheritance instantiation.

use super::MetaBuilder;
use crate::base::{ClassId, qualify, scope_chain};
use crate::decl::TypeSpec;
use crate::diagnostics::{RejectReason, codes};
use crate::model::{FunctionKind, MetaField, MetaType, TemplateBinding, substitute};
use crate::signature;

impl MetaBuilder<'_> {
    pub(super) fn setup_inheritance(&mut self) {
        let ids: Vec<ClassId> = self.model.classes().iter().map(|c| c.id).collect();
        for id in ids {
            self.setup_class_inheritance(id);
        }
    }

    /// Resolve the bases of `id`, setting up each base first.
    fn setup_class_inheritance(&mut self, id: ClassId) {
        if self.inheritance_done.contains(&id) || !self.inheritance_in_progress.insert(id) {
            return;
        }
        let base_names = self.model.class(id).base_names.clone();
        let scope = self.enclosing_scope(id);

        match base_names.as_slice() {
            [single] if single.contains('<') => self.setup_template_base(id, single, &scope),
            _ => {
                for base_name in &base_names {
                    self.link_base(id, base_name, &scope);
                }
            }
        }

        self.inheritance_in_progress.remove(&id);
        self.inheritance_done.insert(id);
    }

    fn link_base(&mut self, id: ClassId, base_name: &str, scope: &str) {
        let Some(base) = self.find_class_in_scope(base_name, scope) else {
            self.diagnostics.warn(
                codes::UNMATCHED_SPECIFICATION,
                format!("base class {} of {} is not exposed", base_name, self.model.class(id).name),
            );
            return;
        };
        if base == id || self.inheritance_in_progress.contains(&base) {
            self.reject_cyclic_base(id, base);
            return;
        }
        self.setup_class_inheritance(base);
        if self.model.inherits_from(base, id) {
            self.reject_cyclic_base(id, base);
            return;
        }
        let class = self.model.class_mut(id);
        if !class.bases.contains(&base) {
            class.bases.push(base);
        }
    }

    fn reject_cyclic_base(&mut self, id: ClassId, base: ClassId) {
        let name = self.model.class(id).name.to_string();
        tracing::debug!("[BUILD] dropping cyclic base {} of {}", self.model.class(base).name, name);
        self.diagnostics.reject_class(name, RejectReason::CyclicDependency);
    }

    fn find_class_in_scope(&self, name: &str, scope: &str) -> Option<ClassId> {
        scope_chain(scope).find_map(|s| self.model.find_class(&qualify(s, name)))
    }

    /// A single instantiated base (`Box<int>`): find the generic template
    /// and instantiate it into `id`.
    fn setup_template_base(&mut self, id: ClassId, base_name: &str, scope: &str) {
        let spec = match signature::parse_type(base_name) {
            Ok(spec) => spec,
            Err(err) => {
                tracing::debug!("[BUILD] unparsable base {}: {}", base_name, err);
                self.reject_template(id);
                return;
            }
        };
        let template = self
            .find_class_in_scope(&spec.name, scope)
            .filter(|t| *t != id && self.model.class(*t).is_template());
        let Some(template) = template else {
            if self.model.class(id).attributes.is_typedef {
                self.reject_template(id);
            } else {
                // An ordinary base that happens to be an instantiation.
                self.link_base(id, &spec.name, scope);
            }
            return;
        };

        self.setup_class_inheritance(template);
        if !self.instantiate_template(id, template, &spec, scope) {
            self.reject_template(id);
        }
    }

    fn reject_template(&mut self, id: ClassId) {
        let name = self.model.class(id).name.to_string();
        self.diagnostics
            .reject_class(name, RejectReason::TemplateInstantiationFailure);
    }

    /// Synthesize the members of `sub` from `template` instantiated with the
    /// arguments of `spec`. Returns false when the arguments do not resolve.
    fn instantiate_template(&mut self, sub: ClassId, template: ClassId, spec: &TypeSpec, scope: &str) -> bool {
        let mut arguments = Vec::with_capacity(spec.instantiations.len());
        for arg in &spec.instantiations {
            match self.resolve_template_argument(arg, scope) {
                Ok(ty) => arguments.push(ty),
                Err(err) => {
                    tracing::debug!("[BUILD] template argument {}: {}", arg, err);
                    return false;
                }
            }
        }
        let parameters = self.model.class(template).template_parameters.clone();
        if arguments.len() > parameters.len() {
            return false;
        }

        let template_entry = self.model.class(template).entry;
        let subclass_type = MetaType::from_entry(self.registry, self.model.class(sub).entry);
        let binding = TemplateBinding {
            template: template_entry,
            parameters: &parameters,
            arguments: &arguments,
            subclass: &subclass_type,
        };

        let template_bases = self.model.class(template).bases.clone();
        let is_typedef_class = self.model.class(sub).attributes.is_typedef;
        let sub_simple = self.model.class(sub).simple_name().to_string();
        let declared: Vec<String> = self
            .model
            .functions_of(sub)
            .map(|f| f.original_name.to_string())
            .collect();

        let mut copies = Vec::new();
        for function in self.model.functions_of(template) {
            match function.kind {
                FunctionKind::Destructor => continue,
                kind if kind.is_constructor() && !is_typedef_class => continue,
                _ => {}
            }
            if !function.is_constructor() && declared.iter().any(|n| n.as_str() == &*function.original_name) {
                continue;
            }
            let return_type = match &function.return_type {
                Some(ty) => match substitute(ty, &binding) {
                    Some(ty) => Some(ty),
                    None => continue,
                },
                None => None,
            };
            let mut copy = function.clone();
            copy.return_type = return_type;
            copy.arguments = function
                .arguments
                .iter()
                .filter_map(|arg| {
                    let mut arg = arg.clone();
                    arg.ty = substitute(&arg.ty, &binding)?;
                    Some(arg)
                })
                .collect();
            if copy.arguments.len() < function.arguments.len() {
                continue;
            }
            if copy.is_constructor() {
                copy.name = sub_simple.as_str().into();
                copy.original_name = copy.name.clone();
            }
            copy.owner = Some(sub);
            copy.implementing_class = Some(sub);
            copy.declaring_class = Some(template);
            copy.attributes.is_synthesized = true;
            copies.push(copy);
        }

        let fields: Vec<MetaField> = self
            .model
            .class(template)
            .fields
            .iter()
            .filter(|f| !f.is_static)
            .filter_map(|f| {
                let mut field = f.clone();
                field.ty = substitute(&f.ty, &binding)?;
                field.enclosing = sub;
                Some(field)
            })
            .collect();

        tracing::debug!(
            "[BUILD] {} instantiates {}: {} functions, {} fields",
            self.model.class(sub).name,
            self.model.class(template).name,
            copies.len(),
            fields.len()
        );

        for copy in copies {
            self.model.add_function(copy);
        }
        let class = self.model.class_mut(sub);
        class.template_base = Some(template);
        class.template_arguments = arguments;
        for base in template_bases {
            if !class.bases.contains(&base) {
                class.bases.push(base);
            }
        }
        for field in fields {
            if class.field(&field.name).is_none() {
                class.fields.push(field);
            }
        }
        true
    }
}
