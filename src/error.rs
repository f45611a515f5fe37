//! Error types for specification loading, type resolution and model building.

use thiserror::Error;

use crate::diagnostics::RejectReason;
use crate::signature::SignatureError;

/// Errors raised while turning a binding specification into a registry.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A rejection or name pattern that is not a valid regular expression.
    #[error("invalid pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// An API version string that is not `major[.minor[.patch]]`.
    #[error("invalid API version `{0}`")]
    InvalidVersion(String),

    /// A signature written in the specification that does not parse.
    #[error("invalid signature `{text}`: {source}")]
    Signature {
        text: String,
        #[source]
        source: SignatureError,
    },

    /// A reference to an entry the specification never declares.
    #[error("unknown {kind}: {name}")]
    Unknown { kind: &'static str, name: String },

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(String),

    /// IO error while reading a specification document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn signature(text: impl Into<String>, source: SignatureError) -> Self {
        Self::Signature {
            text: text.into(),
            source,
        }
    }

    pub fn unknown(kind: &'static str, name: impl Into<String>) -> Self {
        Self::Unknown {
            kind,
            name: name.into(),
        }
    }
}

/// Where a type reference appears, used to pick the rejection reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypePosition {
    Return,
    Argument,
    Field,
}

/// Failure to resolve one type reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("type `{0}` not found")]
    NotFound(String),

    /// Several entries of different kinds match the name.
    #[error("type `{name}` is ambiguous ({kinds})")]
    Ambiguous { name: String, kinds: String },

    #[error("typedef `{0}` does not resolve to a type")]
    Typedef(String),

    #[error("smart pointer `{name}`: {message}")]
    SmartPointer { name: String, message: String },

    #[error("array dimension `{0}` is not a known constant")]
    ArrayDimension(String),

    /// A template class used with the wrong number of arguments.
    #[error("template `{name}` expects {expected} argument(s), got {found}")]
    TemplateArity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl ResolveError {
    pub fn smart_pointer(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SmartPointer {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Map to the rejection reason recorded for a declaration that failed
    /// because of this error at `position`.
    pub fn reason(&self, position: TypePosition) -> RejectReason {
        match self {
            ResolveError::Ambiguous { .. } => RejectReason::AmbiguousType,
            _ => match position {
                TypePosition::Return => RejectReason::UnmatchedReturnType,
                TypePosition::Argument => RejectReason::UnmatchedArgumentType,
                TypePosition::Field => RejectReason::UnmatchedFieldType,
            },
        }
    }
}

/// Fatal errors returned by the build entry point.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A specification-added function could not be built.
    #[error("added function `{signature}` in `{scope}` could not be built: {source}")]
    AddedFunction {
        scope: String,
        signature: String,
        #[source]
        source: ResolveError,
    },

    #[error(transparent)]
    Spec(#[from] SpecError),
}
