//! Session and sink error types

use drift_model::ModelError;
use thiserror::Error;

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors starting a session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The emulation request violates its invariants
    #[error("invalid emulation: {0}")]
    Invalid(#[from] ModelError),

    /// A session is still playing
    #[error("a session is already running")]
    AlreadyRunning,
}

/// Errors publishing a sample
#[derive(Debug, Error)]
pub enum SinkError {
    /// The consumer is gone
    #[error("{stream} sink is closed")]
    Closed {
        /// Stream name (position, motion, cell)
        stream: &'static str,
    },

    /// The consumer refused the sample
    #[error("{stream} sink rejected sample: {reason}")]
    Rejected {
        /// Stream name (position, motion, cell)
        stream: &'static str,
        /// Why the sample was refused
        reason: String,
    },
}

impl SinkError {
    /// Create a Rejected error
    pub fn rejected(stream: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            stream,
            reason: reason.into(),
        }
    }
}
