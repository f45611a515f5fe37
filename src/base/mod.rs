//! Foundation types for the binding metamodel.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TypeEntryId`], [`ClassId`], [`FunctionId`], [`EnumId`] - Stable arena indices
//! - Qualified-name helpers (`::` scopes that are aware of template brackets)
//!
//! This module has NO dependencies on other bindmeta modules.

mod ids;
mod names;

pub use ids::{ClassId, EnumId, FunctionId, TypeEntryId};
pub use names::{
    ScopeChain, parent_scope, qualify, scope_chain, simple_name, split_scope, strip_template_args,
    SCOPE_SEPARATOR,
};
