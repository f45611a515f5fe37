//! Model-wide invariants checked over larger fixtures.

pub mod tests_ordering;
pub mod tests_resolution;
