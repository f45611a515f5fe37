//! Builder configuration.

use crate::typesystem::ApiVersion;

/// Options controlling a model build.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "kebab-case", default))]
pub struct BuilderOptions {
    /// Entries newer than this version are treated as disabled.
    pub api_version: Option<ApiVersion>,
    pub generate_default_constructors: bool,
    pub generate_copy_constructors: bool,
    /// Move free operator functions into the classes they operate on.
    pub rehome_operators: bool,
    pub precedence: PrecedenceRules,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            api_version: None,
            generate_default_constructors: true,
            generate_copy_constructors: true,
            rehome_operators: true,
            precedence: PrecedenceRules::default(),
        }
    }
}

/// Type-name lists driving overload sibling ordering.
///
/// Names are matched against the qualified name of an argument's type entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "interchange", derive(serde::Deserialize))]
#[cfg_attr(feature = "interchange", serde(rename_all = "kebab-case", default))]
pub struct PrecedenceRules {
    /// Host types accepting any object; checked after everything else.
    pub any_object: Vec<String>,
    /// Generic sequence-like host types.
    pub sequence: Vec<String>,
    /// Buffer-like host types; checked before sequences.
    pub buffer: Vec<String>,
    /// Specialized string types; checked before byte sequences.
    pub string: Vec<String>,
    pub byte_sequence: Vec<String>,
    /// Integer primitives, checked after enums and non-integer primitives.
    pub integer_primitives: Vec<String>,
    /// Floating-point and boolean primitives.
    pub non_integer_primitives: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for PrecedenceRules {
    fn default() -> Self {
        Self {
            any_object: names(&["PyObject", "PyTypeObject"]),
            sequence: names(&["PySequence"]),
            buffer: names(&["PyBuffer"]),
            string: names(&["QString"]),
            byte_sequence: names(&["QByteArray"]),
            integer_primitives: names(&[
                "char",
                "signed char",
                "unsigned char",
                "short",
                "unsigned short",
                "int",
                "unsigned int",
                "long",
                "unsigned long",
                "long long",
                "unsigned long long",
                "int8_t",
                "uint8_t",
                "int16_t",
                "uint16_t",
                "int32_t",
                "uint32_t",
                "int64_t",
                "uint64_t",
                "size_t",
            ]),
            non_integer_primitives: names(&["float", "double", "long double", "bool"]),
        }
    }
}

impl PrecedenceRules {
    pub fn is_any_object(&self, name: &str) -> bool {
        self.any_object.iter().any(|n| n == name)
    }

    pub fn is_sequence(&self, name: &str) -> bool {
        self.sequence.iter().any(|n| n == name)
    }

    pub fn is_buffer(&self, name: &str) -> bool {
        self.buffer.iter().any(|n| n == name)
    }

    pub fn is_string(&self, name: &str) -> bool {
        self.string.iter().any(|n| n == name)
    }

    pub fn is_byte_sequence(&self, name: &str) -> bool {
        self.byte_sequence.iter().any(|n| n == name)
    }

    pub fn is_integer(&self, name: &str) -> bool {
        self.integer_primitives.iter().any(|n| n == name)
    }

    pub fn is_non_integer(&self, name: &str) -> bool {
        self.non_integer_primitives.iter().any(|n| n == name)
    }
}
