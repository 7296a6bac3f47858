//! Model error types

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised when an emulation request violates its invariants
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// Velocity must be finite and strictly positive
    #[error("velocity must be positive, got {0}")]
    InvalidVelocity(f64),

    /// Repeat count must be at least one
    #[error("repeat must be at least 1, got {0}")]
    InvalidRepeat(u32),

    /// Salt amplitude must be finite and non-negative
    #[error("salt must be a non-negative finite number, got {0}")]
    InvalidSalt(f64),
}
