//! Shared helpers for integration tests.

pub mod model_assertions;
pub mod model_helpers;
