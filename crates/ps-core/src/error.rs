//! Core error type.
//!
//! Sub-crates define their own error enums (`GeometryError`, `SimError`, …)
//! and wrap `CoreError` where a core primitive rejects its input.

use thiserror::Error;

/// Errors raised by `ps-core` constructors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),
}

/// Shorthand result type for `ps-core`.
pub type CoreResult<T> = Result<T, CoreError>;
