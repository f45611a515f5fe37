//! Declaration items: namespaces, classes, enums, typedefs, functions, fields.

use super::types::TypeSpec;
use crate::signature::{self, SignatureError};

/// Access level of a declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "lowercase"))]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn is_public(self) -> bool {
        matches!(self, Access::Public)
    }
}

/// Function modifiers as parsed from the declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FunctionModifiers {
    pub is_static: bool,
    pub is_virtual: bool,
    /// Pure virtual (`= 0`).
    pub is_abstract: bool,
    pub is_const: bool,
    pub is_override: bool,
    pub is_final: bool,
    pub is_explicit: bool,
    /// `= delete`.
    pub is_deleted: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentDecl {
    pub name: String,
    pub ty: TypeSpec,
    /// Default value source text, if any.
    pub default_value: Option<String>,
}

impl ArgumentDecl {
    pub fn new(name: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    /// `None` for constructors and destructors. Conversion operators carry
    /// their target type here.
    pub return_type: Option<TypeSpec>,
    pub arguments: Vec<ArgumentDecl>,
    pub access: Access,
    pub modifiers: FunctionModifiers,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: Some(TypeSpec::void()),
            arguments: Vec::new(),
            access: Access::Public,
            modifiers: FunctionModifiers::default(),
        }
    }

    /// Build a declaration from a literal signature such as
    /// `virtual int size(const Foo& f, int n = 0) const`.
    pub fn parse(text: &str) -> Result<Self, SignatureError> {
        signature::parse_function(text)
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_argument(mut self, arg: ArgumentDecl) -> Self {
        self.arguments.push(arg);
        self
    }

    /// Normalized signature used for matching and diagnostics:
    /// `name(const Foo&,int)`, with a `const` suffix for const methods.
    pub fn signature(&self) -> String {
        let args: Vec<String> = self.arguments.iter().map(|a| a.ty.to_string()).collect();
        let mut sig = format!("{}({})", self.name, args.join(","));
        if self.modifiers.is_const {
            sig.push_str("const");
        }
        sig
    }

    pub fn is_operator(&self) -> bool {
        is_operator_name(&self.name)
    }
}

/// True for names like `operator==` or `operator bool`.
pub fn is_operator_name(name: &str) -> bool {
    name.strip_prefix("operator")
        .is_some_and(|rest| rest.starts_with(|c: char| !c.is_alphanumeric() && c != '_'))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeSpec,
    pub access: Access,
    pub is_static: bool,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            name: name.into(),
            ty,
            access: Access::Public,
            is_static: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValueDecl {
    pub name: String,
    /// Initializer source text, if any.
    pub value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<EnumValueDecl>,
    /// `enum class`.
    pub is_scoped: bool,
    pub access: Access,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            is_scoped: false,
            access: Access::Public,
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, value: Option<&str>) -> Self {
        self.values.push(EnumValueDecl {
            name: name.into(),
            value: value.map(str::to_string),
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedefDecl {
    pub name: String,
    pub target: TypeSpec,
}

impl TypedefDecl {
    pub fn new(name: impl Into<String>, target: TypeSpec) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClassKind {
    #[default]
    Class,
    Struct,
    Union,
}

/// A base class reference as written (`Base`, `ns::Box<int>`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseSpec {
    pub name: String,
    pub access: Access,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub kind: ClassKind,
    pub bases: Vec<BaseSpec>,
    /// Template parameter names for generic templates (`T`, `U`).
    pub template_parameters: Vec<String>,
    pub items: Vec<Item>,
    pub is_final: bool,
    pub access: Access,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_base(mut self, name: impl Into<String>) -> Self {
        self.bases.push(BaseSpec {
            name: name.into(),
            access: Access::Public,
        });
        self
    }

    pub fn with_template_parameter(mut self, name: impl Into<String>) -> Self {
        self.template_parameters.push(name.into());
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_function(self, function: FunctionDecl) -> Self {
        self.with_item(Item::Function(function))
    }

    pub fn with_field(self, field: FieldDecl) -> Self {
        self.with_item(Item::Field(field))
    }

    pub fn is_template(&self) -> bool {
        !self.template_parameters.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub name: String,
    pub items: Vec<Item>,
}

impl NamespaceDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }
}

/// A single declaration item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Namespace(NamespaceDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
    Typedef(TypedefDecl),
    Function(FunctionDecl),
    Field(FieldDecl),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Namespace(n) => &n.name,
            Item::Class(c) => &c.name,
            Item::Enum(e) => &e.name,
            Item::Typedef(t) => &t.name,
            Item::Function(f) => &f.name,
            Item::Field(f) => &f.name,
        }
    }
}

/// The global scope of a parsed library.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslationUnit {
    pub items: Vec<Item>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }
}
