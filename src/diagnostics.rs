//! Diagnostics: rejected declarations and build warnings.
//!
//! Every declaration the builder drops is recorded with a [`RejectReason`]
//! and its original signature, in one of four buckets (classes, enums,
//! functions, fields). Non-fatal problems that are not tied to a single
//! declaration (ordering cycles, validation failures) are warnings.

use std::fmt::{self, Write as _};

use indexmap::IndexMap;

// ============================================================================
// REJECT REASONS
// ============================================================================

/// Why a declaration was left out of the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    NotInSpecification,
    GenerationDisabled,
    RedefinedToNonClass,
    UnmatchedReturnType,
    UnmatchedArgumentType,
    UnmatchedFieldType,
    AmbiguousType,
    CyclicDependency,
    TemplateInstantiationFailure,
}

impl RejectReason {
    /// Stable reason code.
    pub fn code(self) -> &'static str {
        match self {
            RejectReason::NotInSpecification => codes::NOT_IN_SPECIFICATION,
            RejectReason::GenerationDisabled => codes::GENERATION_DISABLED,
            RejectReason::RedefinedToNonClass => codes::REDEFINED_TO_NON_CLASS,
            RejectReason::UnmatchedReturnType => codes::UNMATCHED_RETURN_TYPE,
            RejectReason::UnmatchedArgumentType => codes::UNMATCHED_ARGUMENT_TYPE,
            RejectReason::UnmatchedFieldType => codes::UNMATCHED_FIELD_TYPE,
            RejectReason::AmbiguousType => codes::AMBIGUOUS_TYPE,
            RejectReason::CyclicDependency => codes::CYCLIC_DEPENDENCY,
            RejectReason::TemplateInstantiationFailure => codes::TEMPLATE_INSTANTIATION_FAILURE,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RejectReason::NotInSpecification => "not in the binding specification",
            RejectReason::GenerationDisabled => "generation disabled",
            RejectReason::RedefinedToNonClass => "redefined to a non-class type",
            RejectReason::UnmatchedReturnType => "unmatched return type",
            RejectReason::UnmatchedArgumentType => "unmatched argument type",
            RejectReason::UnmatchedFieldType => "unmatched field type",
            RejectReason::AmbiguousType => "ambiguous type",
            RejectReason::CyclicDependency => "cyclic dependency",
            RejectReason::TemplateInstantiationFailure => "template instantiation failed",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Reason and warning codes.
///
/// - **R0001-R0099**: rejection reasons
/// - **W0001-W0099**: build warnings
pub mod codes {
    pub const NOT_IN_SPECIFICATION: &str = "R0001";
    pub const GENERATION_DISABLED: &str = "R0002";
    pub const REDEFINED_TO_NON_CLASS: &str = "R0003";
    pub const UNMATCHED_RETURN_TYPE: &str = "R0004";
    pub const UNMATCHED_ARGUMENT_TYPE: &str = "R0005";
    pub const UNMATCHED_FIELD_TYPE: &str = "R0006";
    pub const AMBIGUOUS_TYPE: &str = "R0007";
    pub const CYCLIC_DEPENDENCY: &str = "R0008";
    pub const TEMPLATE_INSTANTIATION_FAILURE: &str = "R0009";

    /// Class ordering hit a dependency cycle.
    pub const CLASS_ORDER_CYCLE: &str = "W0001";
    /// Overload sibling ordering hit a precedence cycle.
    pub const OVERLOAD_ORDER_CYCLE: &str = "W0002";
    /// A specification entry has no matching declaration.
    pub const UNMATCHED_SPECIFICATION: &str = "W0003";
    /// An enumerator value could not be evaluated.
    pub const ENUM_VALUE: &str = "W0004";
}

// ============================================================================
// RECORDS
// ============================================================================

/// Which bucket a rejection belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectCategory {
    Class,
    Enum,
    Function,
    Field,
}

/// One rejected declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub signature: String,
    pub reason: RejectReason,
    /// Extra context, such as the type that failed to resolve.
    pub detail: Option<String>,
}

/// A warning not tied to a single rejected declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    pub code: &'static str,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

// ============================================================================
// COLLECTOR
// ============================================================================

/// Collects rejections and warnings during a build.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    classes: IndexMap<String, Rejection>,
    enums: IndexMap<String, Rejection>,
    functions: IndexMap<String, Rejection>,
    fields: IndexMap<String, Rejection>,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rejection. A signature already recorded in the same bucket
    /// keeps its first reason.
    pub fn reject(
        &mut self,
        category: RejectCategory,
        signature: impl Into<String>,
        reason: RejectReason,
        detail: Option<String>,
    ) {
        let signature = signature.into();
        tracing::trace!(
            "[REJECT] {:?} {} -> {}",
            category,
            signature,
            reason.code()
        );
        self.bucket_mut(category)
            .entry(signature.clone())
            .or_insert(Rejection {
                signature,
                reason,
                detail,
            });
    }

    pub fn reject_class(&mut self, signature: impl Into<String>, reason: RejectReason) {
        self.reject(RejectCategory::Class, signature, reason, None);
    }

    pub fn reject_enum(&mut self, signature: impl Into<String>, reason: RejectReason) {
        self.reject(RejectCategory::Enum, signature, reason, None);
    }

    pub fn reject_function(&mut self, signature: impl Into<String>, reason: RejectReason) {
        self.reject(RejectCategory::Function, signature, reason, None);
    }

    pub fn reject_field(&mut self, signature: impl Into<String>, reason: RejectReason) {
        self.reject(RejectCategory::Field, signature, reason, None);
    }

    pub fn warn(&mut self, code: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("[{}] {}", code, message);
        self.warnings.push(Warning { code, message });
    }

    pub fn bucket(&self, category: RejectCategory) -> &IndexMap<String, Rejection> {
        match category {
            RejectCategory::Class => &self.classes,
            RejectCategory::Enum => &self.enums,
            RejectCategory::Function => &self.functions,
            RejectCategory::Field => &self.fields,
        }
    }

    fn bucket_mut(&mut self, category: RejectCategory) -> &mut IndexMap<String, Rejection> {
        match category {
            RejectCategory::Class => &mut self.classes,
            RejectCategory::Enum => &mut self.enums,
            RejectCategory::Function => &mut self.functions,
            RejectCategory::Field => &mut self.fields,
        }
    }

    pub fn rejected_classes(&self) -> &IndexMap<String, Rejection> {
        &self.classes
    }

    pub fn rejected_enums(&self) -> &IndexMap<String, Rejection> {
        &self.enums
    }

    pub fn rejected_functions(&self) -> &IndexMap<String, Rejection> {
        &self.functions
    }

    pub fn rejected_fields(&self) -> &IndexMap<String, Rejection> {
        &self.fields
    }

    /// Reason recorded for `signature` in `category`, if any.
    pub fn reason(&self, category: RejectCategory, signature: &str) -> Option<RejectReason> {
        self.bucket(category).get(signature).map(|r| r.reason)
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Total number of rejections and warnings.
    pub fn len(&self) -> usize {
        self.classes.len()
            + self.enums.len()
            + self.functions.len()
            + self.fields.len()
            + self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render a human-readable rejection log, grouped by bucket and reason.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let buckets = [
            ("classes", &self.classes),
            ("enums", &self.enums),
            ("functions", &self.functions),
            ("fields", &self.fields),
        ];
        for (title, bucket) in buckets {
            if bucket.is_empty() {
                continue;
            }
            let _ = writeln!(out, "Rejected {} ({}):", title, bucket.len());
            let mut by_reason: IndexMap<RejectReason, Vec<&Rejection>> = IndexMap::new();
            for rejection in bucket.values() {
                by_reason.entry(rejection.reason).or_default().push(rejection);
            }
            for (reason, rejections) in by_reason {
                let _ = writeln!(out, "  {}:", reason);
                for rejection in rejections {
                    match &rejection.detail {
                        Some(detail) => {
                            let _ = writeln!(out, "    {} ({})", rejection.signature, detail);
                        }
                        None => {
                            let _ = writeln!(out, "    {}", rejection.signature);
                        }
                    }
                }
            }
        }
        if !self.warnings.is_empty() {
            let _ = writeln!(out, "Warnings ({}):", self.warnings.len());
            for warning in &self.warnings {
                let _ = writeln!(out, "  {}", warning);
            }
        }
        out
    }
}
