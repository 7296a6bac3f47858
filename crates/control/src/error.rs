//! Control channel error types

use thiserror::Error;

/// Result type for control channel operations
pub type Result<T> = std::result::Result<T, ControlError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors talking to the controller
#[derive(Debug, Error)]
pub enum ControlError {
    /// Connection refused, reset, timed out
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// A message arrived but could not be understood
    #[error("malformed message: {0}")]
    Malformed(String),

    /// The controller answered with a status the contract does not allow
    #[error("unexpected status {status} from {endpoint}")]
    UnexpectedStatus {
        /// Endpoint path
        endpoint: String,
        /// HTTP status code
        status: u16,
    },

    /// Frame length outside the accepted range
    #[error("frame of {size} bytes exceeds limit of {limit}")]
    Frame {
        /// Declared frame size
        size: usize,
        /// Maximum accepted size
        limit: usize,
    },

    /// The connection is gone or was never opened
    #[error("connection closed")]
    Closed,
}

impl ControlError {
    /// Create an UnexpectedStatus error
    pub fn unexpected_status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            endpoint: endpoint.into(),
            status,
        }
    }

    /// Whether the current connection must be dropped
    ///
    /// Only malformed messages leave the connection usable.
    pub fn ends_connection(&self) -> bool {
        !matches!(self, Self::Malformed(_))
    }
}

impl From<reqwest::Error> for ControlError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

impl From<std::io::Error> for ControlError {
    fn from(e: std::io::Error) -> Self {
        Self::Transport(Box::new(e))
    }
}

impl From<serde_json::Error> for ControlError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}
