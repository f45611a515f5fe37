//! Raw, unresolved type references as written in declarations.

use std::fmt;

/// Reference qualifier of a type (`T`, `T&`, `T&&`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    #[default]
    None,
    LValue,
    RValue,
}

impl ReferenceKind {
    pub fn is_reference(self) -> bool {
        !matches!(self, ReferenceKind::None)
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ReferenceKind::None => "",
            ReferenceKind::LValue => "&",
            ReferenceKind::RValue => "&&",
        }
    }
}

/// One array dimension: `[]` or `[N]` where `N` is the source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArrayDim {
    Unspecified,
    Sized(String),
}

/// A raw type reference: name, qualifiers, indirections, array dimensions
/// and template instantiation arguments, exactly as the declaration wrote it.
///
/// Non-type template arguments (`Array<int, 3>`) are represented as a
/// `TypeSpec` whose name is the literal text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TypeSpec {
    /// Name as written, possibly qualified (`std::vector`, `unsigned int`).
    pub name: String,
    pub is_const: bool,
    pub is_volatile: bool,
    /// Number of pointer levels.
    pub indirections: u8,
    pub reference: ReferenceKind,
    /// Array dimensions, outermost first.
    pub array_dims: Vec<ArrayDim>,
    /// Template instantiation arguments.
    pub instantiations: Vec<TypeSpec>,
}

impl TypeSpec {
    /// A plain by-value type with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn void() -> Self {
        Self::named("void")
    }

    /// Add one pointer level.
    pub fn pointer(mut self) -> Self {
        self.indirections += 1;
        self
    }

    /// Turn this into `const T&`.
    pub fn const_ref(mut self) -> Self {
        self.is_const = true;
        self.reference = ReferenceKind::LValue;
        self
    }

    pub fn with_instantiations(mut self, args: Vec<TypeSpec>) -> Self {
        self.instantiations = args;
        self
    }

    pub fn with_array_dim(mut self, dim: ArrayDim) -> Self {
        self.array_dims.push(dim);
        self
    }

    pub fn is_void(&self) -> bool {
        self.name == "void" && self.indirections == 0 && self.array_dims.is_empty()
    }

    pub fn has_instantiations(&self) -> bool {
        !self.instantiations.is_empty()
    }

    /// True for non-type template arguments such as `3` or `-1`.
    pub fn is_numeric_literal(&self) -> bool {
        let text = self.name.strip_prefix('-').unwrap_or(&self.name);
        !text.is_empty() && text.chars().next().is_some_and(|c| c.is_ascii_digit())
    }

    /// Same type with array dimensions removed.
    pub fn element(&self) -> TypeSpec {
        TypeSpec {
            array_dims: Vec::new(),
            ..self.clone()
        }
    }

    /// The name together with its instantiation list (`Box<int>`).
    pub fn instantiated_name(&self) -> String {
        if self.instantiations.is_empty() {
            return self.name.clone();
        }
        let args: Vec<String> = self.instantiations.iter().map(|a| a.to_string()).collect();
        format!("{}<{}>", self.name, args.join(","))
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            f.write_str("const ")?;
        }
        if self.is_volatile {
            f.write_str("volatile ")?;
        }
        f.write_str(&self.instantiated_name())?;
        for _ in 0..self.indirections {
            f.write_str("*")?;
        }
        f.write_str(self.reference.suffix())?;
        for dim in &self.array_dims {
            match dim {
                ArrayDim::Unspecified => f.write_str("[]")?,
                ArrayDim::Sized(n) => write!(f, "[{n}]")?,
            }
        }
        Ok(())
    }
}
