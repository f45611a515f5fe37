//! Per-member customizations: function and field modifications, added functions.

use crate::decl::Access;

/// Who owns an object passed through an argument or return value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "interchange", derive(serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "lowercase"))]
pub enum Ownership {
    /// Ownership passes to the host runtime.
    Target,
    /// Ownership passes to native code.
    Native,
    Default,
}

/// A modification of one argument, addressed by zero-based position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgumentModification {
    pub index: usize,
    pub rename: Option<String>,
    /// Replacement default-value expression.
    pub default_value: Option<String>,
    pub remove_default: bool,
    /// Host-visible type name replacing the native argument type.
    pub replace_type: Option<String>,
    pub ownership: Option<Ownership>,
}

impl ArgumentModification {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn without_default(mut self) -> Self {
        self.remove_default = true;
        self
    }

    pub fn replacing_type(mut self, name: impl Into<String>) -> Self {
        self.replace_type = Some(name.into());
        self
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = Some(ownership);
        self
    }
}

/// A modification of a function, addressed by signature or by bare name.
///
/// A signature containing `(` matches a single overload by its normalized
/// minimal signature; a bare name matches every overload with that name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionModification {
    pub signature: String,
    pub rename: Option<String>,
    pub remove: bool,
    pub access: Option<Access>,
    pub arguments: Vec<ArgumentModification>,
}

impl FunctionModification {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            ..Self::default()
        }
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn removed(mut self) -> Self {
        self.remove = true;
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = Some(access);
        self
    }

    pub fn with_argument(mut self, modification: ArgumentModification) -> Self {
        self.arguments.push(modification);
        self
    }

    pub fn is_name_only(&self) -> bool {
        !self.signature.contains('(')
    }

    /// Whether this modification applies to a function with the given name
    /// and normalized minimal signature.
    pub fn matches(&self, name: &str, minimal_signature: &str) -> bool {
        if self.is_name_only() {
            self.signature == name
        } else {
            self.signature == minimal_signature
        }
    }

    pub fn argument(&self, index: usize) -> Option<&ArgumentModification> {
        self.arguments.iter().find(|a| a.index == index)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldModification {
    pub name: String,
    pub rename: Option<String>,
    pub remove: bool,
    pub read_only: bool,
}

impl FieldModification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn removed(mut self) -> Self {
        self.remove = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

/// A function declared only in the specification, written as a full
/// signature including the return type (`int count(const QString&) const`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddedFunction {
    pub signature: String,
    pub access: Access,
    pub is_static: bool,
}

impl AddedFunction {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            access: Access::Public,
            is_static: false,
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}
