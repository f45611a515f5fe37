//! Functions and their arguments.

use std::sync::Arc;

use smol_str::SmolStr;

use super::types::MetaType;
use crate::base::{ClassId, FunctionId};
use crate::decl::Access;
use crate::typesystem::{FunctionModification, Ownership};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Constructor,
    CopyConstructor,
    MoveConstructor,
    Destructor,
    Normal,
    AssignmentOperator,
    ConversionOperator,
    Operator,
}

impl FunctionKind {
    pub fn is_constructor(self) -> bool {
        matches!(
            self,
            FunctionKind::Constructor | FunctionKind::CopyConstructor | FunctionKind::MoveConstructor
        )
    }

    pub fn is_operator(self) -> bool {
        matches!(
            self,
            FunctionKind::Operator | FunctionKind::AssignmentOperator | FunctionKind::ConversionOperator
        )
    }
}

/// Modifier and provenance flags of a function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FunctionAttributes {
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    pub is_const: bool,
    pub is_override: bool,
    pub is_final: bool,
    pub is_explicit: bool,
    pub is_deleted: bool,
    /// Declared by the specification, not by the native library.
    pub is_user_added: bool,
    /// Created by the builder (default/copy constructors, template members).
    pub is_synthesized: bool,
    /// A rehomed binary operator whose receiver is its right operand.
    pub is_reverse_operator: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaArgument {
    pub name: SmolStr,
    pub ty: MetaType,
    /// Effective default-value expression, after modifications.
    pub default_value: Option<String>,
    /// Default value as declared natively.
    pub original_default_value: Option<String>,
    pub index: usize,
    /// Host-visible replacement type name from a modification.
    pub replaced_type: Option<String>,
    pub ownership: Option<Ownership>,
}

impl MetaArgument {
    pub fn new(name: impl Into<SmolStr>, ty: MetaType, index: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
            original_default_value: None,
            index,
            replaced_type: None,
            ownership: None,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaFunction {
    pub id: FunctionId,
    /// Exposed name (after renames).
    pub name: Arc<str>,
    pub original_name: Arc<str>,
    /// Class owning this function in the model; `None` for free functions.
    pub owner: Option<ClassId>,
    /// Class that declared the function natively (the template for
    /// functions inherited from one).
    pub declaring_class: Option<ClassId>,
    /// Class providing the implementation used for calls.
    pub implementing_class: Option<ClassId>,
    pub arguments: Vec<MetaArgument>,
    /// `None` for constructors and destructors.
    pub return_type: Option<MetaType>,
    pub kind: FunctionKind,
    pub access: Access,
    pub attributes: FunctionAttributes,
    /// Specification modifications applied to this function.
    pub modifications: Vec<FunctionModification>,
    /// The native signature the function was built from.
    pub original_signature: String,
}

impl MetaFunction {
    pub fn new(name: impl Into<Arc<str>>, kind: FunctionKind) -> Self {
        let name = name.into();
        Self {
            id: FunctionId::new(0),
            original_name: name.clone(),
            name,
            owner: None,
            declaring_class: None,
            implementing_class: None,
            arguments: Vec::new(),
            return_type: None,
            kind,
            access: Access::Public,
            attributes: FunctionAttributes::default(),
            modifications: Vec::new(),
            original_signature: String::new(),
        }
    }

    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Number of arguments without a default value.
    pub fn min_arity(&self) -> usize {
        self.arguments.iter().filter(|a| !a.has_default()).count()
    }

    pub fn is_constructor(&self) -> bool {
        self.kind.is_constructor()
    }

    pub fn is_public(&self) -> bool {
        self.access.is_public()
    }

    /// `name(type,type)` with a `const` suffix, over the original name.
    pub fn minimal_signature(&self) -> String {
        let args: Vec<String> = self.arguments.iter().map(|a| a.ty.signature()).collect();
        let mut sig = format!("{}({})", self.original_name, args.join(","));
        if self.attributes.is_const {
            sig.push_str("const");
        }
        sig
    }

    /// Whether a single-argument call makes this an implicit conversion
    /// (a non-explicit constructor taking one required argument).
    pub fn is_implicit_conversion(&self) -> bool {
        self.is_constructor()
            && self.kind != FunctionKind::CopyConstructor
            && self.kind != FunctionKind::MoveConstructor
            && !self.attributes.is_explicit
            && self.is_public()
            && self.arity() >= 1
            && self.min_arity() <= 1
    }
}
