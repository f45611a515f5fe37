//! Type entries: the registry's record for one resolvable named type.

use std::fmt;
use std::sync::Arc;

use super::modifications::{AddedFunction, FieldModification, FunctionModification};
use super::version::ApiVersion;
use crate::base::TypeEntryId;

// ============================================================================
// KINDS AND FLAGS
// ============================================================================

/// Kind of a type entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeEntryKind {
    Primitive,
    Enum,
    Flags,
    Value,
    Object,
    Container,
    SmartPointer,
    Function,
    Namespace,
    Typedef,
    TemplateArgument,
    Array,
    Constant,
    Custom,
    Void,
    Varargs,
}

impl TypeEntryKind {
    /// Kinds that become a MetaClass.
    pub fn is_complex(self) -> bool {
        matches!(
            self,
            TypeEntryKind::Value | TypeEntryKind::Object | TypeEntryKind::Namespace
        )
    }

    /// Kinds that are instantiated with template arguments.
    pub fn is_template_like(self) -> bool {
        matches!(self, TypeEntryKind::Container | TypeEntryKind::SmartPointer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeEntryKind::Primitive => "primitive",
            TypeEntryKind::Enum => "enum",
            TypeEntryKind::Flags => "flags",
            TypeEntryKind::Value => "value",
            TypeEntryKind::Object => "object",
            TypeEntryKind::Container => "container",
            TypeEntryKind::SmartPointer => "smart-pointer",
            TypeEntryKind::Function => "function",
            TypeEntryKind::Namespace => "namespace",
            TypeEntryKind::Typedef => "typedef",
            TypeEntryKind::TemplateArgument => "template-argument",
            TypeEntryKind::Array => "array",
            TypeEntryKind::Constant => "constant",
            TypeEntryKind::Custom => "custom",
            TypeEntryKind::Void => "void",
            TypeEntryKind::Varargs => "varargs",
        }
    }
}

impl fmt::Display for TypeEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether wrapper code is generated for an entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CodeGeneration {
    #[default]
    Enabled,
    /// Known to the type system and usable in signatures, but no wrapper
    /// is generated (the type is exposed by another module).
    ReferenceOnly,
    Disabled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IncludeKind {
    #[default]
    Global,
    Local,
}

/// A header include attached to an entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Include {
    pub kind: IncludeKind,
    pub name: String,
}

impl Include {
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            kind: IncludeKind::Global,
            name: name.into(),
        }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self {
            kind: IncludeKind::Local,
            name: name.into(),
        }
    }
}

impl fmt::Display for Include {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IncludeKind::Global => write!(f, "<{}>", self.name),
            IncludeKind::Local => write!(f, "\"{}\"", self.name),
        }
    }
}

/// Container flavor, which fixes the number of instantiation arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Set,
    Map,
    MultiMap,
    Pair,
}

impl ContainerKind {
    pub fn arity(self) -> usize {
        match self {
            ContainerKind::List | ContainerKind::Set => 1,
            ContainerKind::Map | ContainerKind::MultiMap | ContainerKind::Pair => 2,
        }
    }
}

/// One host-to-native conversion of a custom conversion rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetToNative {
    /// Name of the host-side (or native) source type accepted by the rule.
    pub source_type: String,
    /// Type-check expression, if the default check is not enough.
    pub check: Option<String>,
    pub code: String,
}

/// Custom conversion rule text attached to an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionRule {
    pub native_to_target: Option<String>,
    pub target_to_native: Vec<TargetToNative>,
}

impl ConversionRule {
    /// Names of the types this rule converts from implicitly.
    pub fn source_types(&self) -> impl Iterator<Item = &str> {
        self.target_to_native.iter().map(|t| t.source_type.as_str())
    }
}

// ============================================================================
// KIND-SPECIFIC DETAIL
// ============================================================================

/// Extra data carried by class-like entries (value, object, namespace).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComplexDetail {
    /// A stream class such as `QDataStream`/`QTextStream`.
    pub stream: bool,
    pub hash_function: Option<String>,
    /// Expression used to default-construct values of this type.
    pub default_constructor: Option<String>,
    /// Overrides copyability detection.
    pub copyable: Option<bool>,
    pub polymorphic_id_expression: Option<String>,
    pub function_modifications: Vec<FunctionModification>,
    pub field_modifications: Vec<FieldModification>,
    pub added_functions: Vec<AddedFunction>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryDetail {
    None,
    Primitive {
        /// The primitive this one is an alias of (`qint32` -> `int`).
        aliases: Option<String>,
        /// Host-side type name, if the primitive maps to one.
        target_name: Option<String>,
        /// Whether this entry is the preferred one among same-named entries.
        preferred: bool,
    },
    Container {
        kind: ContainerKind,
    },
    SmartPointer {
        getter: String,
        ref_count: Option<String>,
        /// Pointee types accepted; empty accepts any class type.
        instantiations: Vec<String>,
    },
    Typedef {
        source: String,
    },
    Enum {
        flags: Option<String>,
    },
    Flags {
        enum_name: String,
    },
    Complex(Box<ComplexDetail>),
    Array {
        element: TypeEntryId,
        count: Option<u64>,
    },
    Constant {
        value: i64,
    },
    TemplateArgument {
        ordinal: usize,
    },
    Function {
        signatures: Vec<String>,
    },
}

// ============================================================================
// TYPE ENTRY
// ============================================================================

/// One resolvable named type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEntry {
    pub kind: TypeEntryKind,
    /// Fully qualified name.
    pub name: Arc<str>,
    /// Owning scope entry (a namespace or class), resolved by lookup.
    pub scope: Option<TypeEntryId>,
    pub codegen: CodeGeneration,
    pub include: Option<Include>,
    pub extra_includes: Vec<Include>,
    /// First API version exposing this entry.
    pub since: Option<ApiVersion>,
    pub conversion_rule: Option<ConversionRule>,
    /// Source entry when this entry is a resolved typedef clone.
    pub typedef_of: Option<TypeEntryId>,
    pub detail: EntryDetail,
}

impl TypeEntry {
    pub fn new(kind: TypeEntryKind, name: impl Into<Arc<str>>) -> Self {
        let detail = match kind {
            TypeEntryKind::Value | TypeEntryKind::Object | TypeEntryKind::Namespace => {
                EntryDetail::Complex(Box::default())
            }
            TypeEntryKind::Primitive => EntryDetail::Primitive {
                aliases: None,
                target_name: None,
                preferred: true,
            },
            TypeEntryKind::Enum => EntryDetail::Enum { flags: None },
            _ => EntryDetail::None,
        };
        Self {
            kind,
            name: name.into(),
            scope: None,
            codegen: CodeGeneration::Enabled,
            include: None,
            extra_includes: Vec::new(),
            since: None,
            conversion_rule: None,
            typedef_of: None,
            detail,
        }
    }

    pub fn primitive(name: impl Into<Arc<str>>) -> Self {
        Self::new(TypeEntryKind::Primitive, name)
    }

    pub fn value_type(name: impl Into<Arc<str>>) -> Self {
        Self::new(TypeEntryKind::Value, name)
    }

    pub fn object_type(name: impl Into<Arc<str>>) -> Self {
        Self::new(TypeEntryKind::Object, name)
    }

    pub fn namespace(name: impl Into<Arc<str>>) -> Self {
        Self::new(TypeEntryKind::Namespace, name)
    }

    pub fn enumeration(name: impl Into<Arc<str>>) -> Self {
        Self::new(TypeEntryKind::Enum, name)
    }

    pub fn custom(name: impl Into<Arc<str>>) -> Self {
        Self::new(TypeEntryKind::Custom, name)
    }

    pub fn container(name: impl Into<Arc<str>>, kind: ContainerKind) -> Self {
        let mut entry = Self::new(TypeEntryKind::Container, name);
        entry.detail = EntryDetail::Container { kind };
        entry
    }

    pub fn smart_pointer(name: impl Into<Arc<str>>, getter: impl Into<String>) -> Self {
        let mut entry = Self::new(TypeEntryKind::SmartPointer, name);
        entry.detail = EntryDetail::SmartPointer {
            getter: getter.into(),
            ref_count: None,
            instantiations: Vec::new(),
        };
        entry
    }

    /// A typedef entry whose source is written as text (`Box<int>`).
    pub fn typedef(name: impl Into<Arc<str>>, source: impl Into<String>) -> Self {
        let mut entry = Self::new(TypeEntryKind::Typedef, name);
        entry.detail = EntryDetail::Typedef {
            source: source.into(),
        };
        entry
    }

    /// A free function entry; `signatures` may be empty to accept every overload.
    pub fn function(name: impl Into<Arc<str>>, signatures: Vec<String>) -> Self {
        let mut entry = Self::new(TypeEntryKind::Function, name);
        entry.detail = EntryDetail::Function { signatures };
        entry
    }

    // ------------------------------------------------------------------------
    // Builder-style setters
    // ------------------------------------------------------------------------

    pub fn with_codegen(mut self, codegen: CodeGeneration) -> Self {
        self.codegen = codegen;
        self
    }

    pub fn with_include(mut self, include: Include) -> Self {
        self.include = Some(include);
        self
    }

    pub fn since(mut self, version: ApiVersion) -> Self {
        self.since = Some(version);
        self
    }

    pub fn with_conversion_rule(mut self, rule: ConversionRule) -> Self {
        self.conversion_rule = Some(rule);
        self
    }

    /// Mark a primitive as an alias of another primitive.
    pub fn aliasing(mut self, target: impl Into<String>) -> Self {
        if let EntryDetail::Primitive { aliases, .. } = &mut self.detail {
            *aliases = Some(target.into());
        }
        self
    }

    /// Mark a primitive as not usable for lookups by name.
    pub fn not_preferred(mut self) -> Self {
        if let EntryDetail::Primitive { preferred, .. } = &mut self.detail {
            *preferred = false;
        }
        self
    }

    pub fn with_target_name(mut self, name: impl Into<String>) -> Self {
        if let EntryDetail::Primitive { target_name, .. } = &mut self.detail {
            *target_name = Some(name.into());
        }
        self
    }

    /// Attach a flags type to an enum entry.
    pub fn with_flags(mut self, flags_name: impl Into<String>) -> Self {
        if let EntryDetail::Enum { flags } = &mut self.detail {
            *flags = Some(flags_name.into());
        }
        self
    }

    /// Restrict the pointee types accepted by a smart pointer.
    pub fn accepting(mut self, pointee: impl Into<String>) -> Self {
        if let EntryDetail::SmartPointer { instantiations, .. } = &mut self.detail {
            instantiations.push(pointee.into());
        }
        self
    }

    /// Edit the complex-type detail in place. No-op for other kinds.
    pub fn with_complex(mut self, edit: impl FnOnce(&mut ComplexDetail)) -> Self {
        if let EntryDetail::Complex(detail) = &mut self.detail {
            edit(detail);
        }
        self
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn is_complex(&self) -> bool {
        self.kind.is_complex()
    }

    pub fn is_primitive(&self) -> bool {
        self.kind == TypeEntryKind::Primitive
    }

    pub fn generates_code(&self) -> bool {
        self.codegen == CodeGeneration::Enabled
    }

    pub fn complex(&self) -> Option<&ComplexDetail> {
        match &self.detail {
            EntryDetail::Complex(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn complex_mut(&mut self) -> Option<&mut ComplexDetail> {
        match &mut self.detail {
            EntryDetail::Complex(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self.detail {
            EntryDetail::Container { kind } => Some(kind),
            _ => None,
        }
    }

    pub fn aliased_primitive(&self) -> Option<&str> {
        match &self.detail {
            EntryDetail::Primitive { aliases, .. } => aliases.as_deref(),
            _ => None,
        }
    }

    pub fn template_ordinal(&self) -> Option<usize> {
        match self.detail {
            EntryDetail::TemplateArgument { ordinal } => Some(ordinal),
            _ => None,
        }
    }

    pub fn constant_value(&self) -> Option<i64> {
        match self.detail {
            EntryDetail::Constant { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_stream(&self) -> bool {
        self.complex().is_some_and(|c| c.stream)
    }

    /// Whether a lookup by name may return this entry.
    pub fn is_usable(&self) -> bool {
        if self.codegen == CodeGeneration::Disabled {
            return false;
        }
        match &self.detail {
            EntryDetail::Primitive { preferred, .. } => *preferred,
            _ => true,
        }
    }

    /// The simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        crate::base::simple_name(&self.name)
    }
}
