//! Classes and fields.

use std::sync::Arc;

use super::types::MetaType;
use crate::base::{ClassId, EnumId, FunctionId, TypeEntryId};
use crate::decl::Access;

/// Capability and shape flags of a class.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClassAttributes {
    pub is_abstract: bool,
    pub is_polymorphic: bool,
    pub is_namespace: bool,
    pub is_constructible: bool,
    pub is_clonable: bool,
    pub is_hashable: bool,
    pub has_equality: bool,
    pub is_destructible: bool,
    /// A generic template (has template parameters).
    pub is_template: bool,
    /// Created from a typedef of a template instantiation.
    pub is_typedef: bool,
    pub is_final: bool,
    pub is_value_type: bool,
    pub has_private_destructor: bool,
    pub has_private_copy_constructor: bool,
    pub has_deleted_copy_constructor: bool,
    /// Has at least one private constructor.
    pub has_private_constructor: bool,
    /// Has at least one user-declared constructor, any access.
    pub has_user_constructors: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaField {
    pub name: Arc<str>,
    pub original_name: Arc<str>,
    pub ty: MetaType,
    pub access: Access,
    pub is_static: bool,
    pub enclosing: ClassId,
    pub is_read_only: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaClass {
    pub id: ClassId,
    pub entry: TypeEntryId,
    /// Qualified name.
    pub name: Arc<str>,
    /// Base names as declared (`Base`, `Box<int>`).
    pub base_names: Vec<String>,
    /// Resolved base classes, in declaration order.
    pub bases: Vec<ClassId>,
    pub enclosing: Option<ClassId>,
    pub inner_classes: Vec<ClassId>,
    pub functions: Vec<FunctionId>,
    pub fields: Vec<MetaField>,
    pub enums: Vec<EnumId>,
    /// TemplateArgument entries for a generic template's parameters.
    pub template_parameters: Vec<TypeEntryId>,
    /// Template this class was instantiated from.
    pub template_base: Option<ClassId>,
    pub template_arguments: Vec<MetaType>,
    pub attributes: ClassAttributes,
    /// Classes whose headers the generated wrapper must include.
    pub include_dependencies: Vec<ClassId>,
}

impl MetaClass {
    pub fn new(id: ClassId, entry: TypeEntryId, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            entry,
            name: name.into(),
            base_names: Vec::new(),
            bases: Vec::new(),
            enclosing: None,
            inner_classes: Vec::new(),
            functions: Vec::new(),
            fields: Vec::new(),
            enums: Vec::new(),
            template_parameters: Vec::new(),
            template_base: None,
            template_arguments: Vec::new(),
            attributes: ClassAttributes::default(),
            include_dependencies: Vec::new(),
        }
    }

    pub fn simple_name(&self) -> &str {
        crate::base::simple_name(&self.name)
    }

    pub fn is_namespace(&self) -> bool {
        self.attributes.is_namespace
    }

    pub fn is_template(&self) -> bool {
        self.attributes.is_template
    }

    pub fn field(&self, name: &str) -> Option<&MetaField> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    pub fn add_include_dependency(&mut self, class: ClassId) {
        if class != self.id && !self.include_dependencies.contains(&class) {
            self.include_dependencies.push(class);
        }
    }
}
