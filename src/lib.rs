//! # bindmeta
//!
//! Semantic core of a binding generator: type resolution, metamodel building
//! and overload decision trees.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! pipeline     → build_binding_model: registry → builder → overloads
//!   ↓
//! overload     → Decision trees over same-named candidates
//!   ↓
//! builder      → Declarations + specification → MetaModel
//!   ↓
//! model        → MetaClass / MetaFunction / MetaField / MetaEnum arenas
//!   ↓
//! registry     → Type entries by qualified name, rejections, synthesized entries
//!   ↓
//! typesystem   → Binding specification: entries, modifications, loader
//!   ↓
//! decl         → Declaration model (the parsed native library)
//!   ↓
//! signature    → Logos lexer, signature parser
//!   ↓
//! base, graph  → Ids, qualified names, dependency graph
//! ```

// ============================================================================
// MODULES (dependency order: base → signature → decl → typesystem → registry
//          → model → builder → overload → pipeline)
// ============================================================================

/// Foundation types: arena ids, qualified-name helpers
pub mod base;

/// Generic dependency graph with topological sort
pub mod graph;

/// Literal type and function signatures
pub mod signature;

/// Declaration model consumed by the builder
pub mod decl;

/// Binding specification: type entries, modifications, rejections
pub mod typesystem;

/// Type registry built from a specification
pub mod registry;

/// Built metamodel
pub mod model;

/// Metamodel builder passes
pub mod builder;

/// Overload groups and call selection
pub mod overload;

/// End-to-end build
pub mod pipeline;

pub mod config;
pub mod diagnostics;
pub mod error;

// Re-export the entry points
pub use builder::{BuildOutput, MetaBuilder};
pub use config::{BuilderOptions, PrecedenceRules};
pub use diagnostics::{Diagnostics, RejectCategory, RejectReason};
pub use error::{BuildError, ResolveError, SpecError};
pub use pipeline::{BindingModel, build_binding_model};

// Re-export foundation types
pub use base::{ClassId, EnumId, FunctionId, TypeEntryId};
pub use decl::TranslationUnit;
pub use model::MetaModel;
pub use registry::TypeRegistry;
pub use typesystem::BindingSpec;
