//! Resolved type references and template substitution.

use std::fmt;
use std::sync::Arc;

use crate::base::TypeEntryId;
use crate::decl::ReferenceKind;
use crate::registry::TypeRegistry;
use crate::typesystem::TypeEntryKind;

/// A type reference resolved to a registry entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaType {
    pub entry: TypeEntryId,
    /// Qualified name of the entry.
    pub name: Arc<str>,
    pub kind: TypeEntryKind,
    pub is_const: bool,
    pub is_volatile: bool,
    pub indirections: u8,
    pub reference: ReferenceKind,
    /// Resolved template arguments (containers, smart pointers, templates).
    pub instantiations: Vec<MetaType>,
    /// For Array entries, the element type of this dimension.
    pub array_element: Option<Box<MetaType>>,
    pub array_count: Option<u64>,
    /// The reference as originally written.
    pub original: String,
}

impl MetaType {
    /// Unqualified reference to a registry entry.
    pub fn from_entry(registry: &TypeRegistry, entry: TypeEntryId) -> Self {
        let e = registry.get(entry);
        Self {
            entry,
            name: e.name.clone(),
            kind: e.kind,
            is_const: false,
            is_volatile: false,
            indirections: 0,
            reference: ReferenceKind::None,
            instantiations: Vec::new(),
            array_element: None,
            array_count: None,
            original: e.name.to_string(),
        }
    }

    pub fn void(registry: &TypeRegistry) -> Self {
        Self::from_entry(registry, registry.void())
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeEntryKind::Void && self.indirections == 0
    }

    /// `char*` / `const char*`: a raw string, distinct from other
    /// character pointers.
    pub fn is_cstring(&self) -> bool {
        self.kind == TypeEntryKind::Primitive && &*self.name == "char" && self.indirections == 1
    }

    pub fn is_container(&self) -> bool {
        self.kind == TypeEntryKind::Container
    }

    pub fn is_smart_pointer(&self) -> bool {
        self.kind == TypeEntryKind::SmartPointer
    }

    pub fn is_template_argument(&self) -> bool {
        self.kind == TypeEntryKind::TemplateArgument
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeEntryKind::Enum
    }

    pub fn is_primitive(&self) -> bool {
        self.kind == TypeEntryKind::Primitive
    }

    /// Class-like type passed by value or reference (no pointer).
    pub fn is_value(&self) -> bool {
        self.kind.is_complex() && self.indirections == 0
    }

    /// Whether this type, or any nested argument, is a template parameter.
    pub fn depends_on_template_argument(&self) -> bool {
        self.is_template_argument()
            || self
                .instantiations
                .iter()
                .any(MetaType::depends_on_template_argument)
            || self
                .array_element
                .as_deref()
                .is_some_and(MetaType::depends_on_template_argument)
    }

    /// Copy pointer, reference and cv qualifiers from another reference.
    pub fn with_qualifiers(mut self, is_const: bool, indirections: u8, reference: ReferenceKind) -> Self {
        self.is_const = is_const;
        self.indirections = indirections;
        self.reference = reference;
        self
    }

    /// Normalized rendering used in signatures (`const QList<int>&`).
    pub fn signature(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MetaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(element) = &self.array_element {
            write!(f, "{element}")?;
            return match self.array_count {
                Some(n) => write!(f, "[{n}]"),
                None => f.write_str("[]"),
            };
        }
        if self.is_const {
            f.write_str("const ")?;
        }
        if self.is_volatile {
            f.write_str("volatile ")?;
        }
        f.write_str(&self.name)?;
        if !self.instantiations.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.instantiations.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.indirections {
            f.write_str("*")?;
        }
        f.write_str(self.reference.suffix())
    }
}

// ============================================================================
// TEMPLATE SUBSTITUTION
// ============================================================================

/// Binding of a generic template's parameters to concrete arguments.
#[derive(Clone, Copy, Debug)]
pub struct TemplateBinding<'a> {
    /// Entry of the generic template class.
    pub template: TypeEntryId,
    /// TemplateArgument entries of the template, by ordinal.
    pub parameters: &'a [TypeEntryId],
    pub arguments: &'a [MetaType],
    /// The instantiating class, which replaces references to the template.
    pub subclass: &'a MetaType,
}

/// Substitute template arguments into `ty`, producing a new type.
///
/// Returns `None` when the type voids out: a parameter with no argument,
/// a `void` argument used by value, or a parameter of some other template.
pub fn substitute(ty: &MetaType, binding: &TemplateBinding<'_>) -> Option<MetaType> {
    if ty.is_template_argument() {
        let ordinal = binding.parameters.iter().position(|p| *p == ty.entry)?;
        let argument = binding.arguments.get(ordinal)?;
        if argument.is_void() && ty.indirections == 0 {
            return None;
        }
        let mut result = argument.clone();
        result.is_const |= ty.is_const;
        result.is_volatile |= ty.is_volatile;
        result.indirections = result.indirections.saturating_add(ty.indirections);
        if ty.reference.is_reference() {
            result.reference = ty.reference;
        }
        result.original = result.to_string();
        return Some(result);
    }

    if ty.entry == binding.template {
        let mut result = binding.subclass.clone().with_qualifiers(
            ty.is_const,
            ty.indirections,
            ty.reference,
        );
        result.is_volatile = ty.is_volatile;
        result.original = result.to_string();
        return Some(result);
    }

    if ty.instantiations.is_empty() && ty.array_element.is_none() {
        return Some(ty.clone());
    }

    let mut result = ty.clone();
    result.instantiations = ty
        .instantiations
        .iter()
        .map(|arg| substitute(arg, binding))
        .collect::<Option<Vec<_>>>()?;
    if let Some(element) = &ty.array_element {
        result.array_element = Some(Box::new(substitute(element, binding)?));
    }
    result.original = result.to_string();
    Some(result)
}
