//! End-to-end scenarios
//!
//! Each test runs the full pipeline (registry, builder, overload groups)
//! over a small declaration tree:
//! - Class rejection by pattern
//! - Template instantiation through a typedef
//! - Overload ordering by inheritance
//! - Class dependency cycles
//! - Operator rehoming

pub mod tests_cycles;
pub mod tests_operators;
pub mod tests_overloads;
pub mod tests_rejection;
pub mod tests_templates;
