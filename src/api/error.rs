//! Transport-level error types
//!
//! None of these reach the wizard: `HttpTransport` logs them and normalizes
//! the outcome into the fallback `{"message": "Error"}` response. Only client
//! construction failures surface to callers.

use thiserror::Error;

/// Errors that can occur while talking to the remote API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Connection, DNS or TLS failure before any response arrived
    #[error("network error: {0}")]
    Network(String),

    /// The response arrived but its body could not be read
    #[error("failed to read response body (HTTP {status}): {message}")]
    Body { status: u16, message: String },

    /// A failure status with nothing usable in the body
    #[error("HTTP {status} without a usable body")]
    EmptyFailure { status: u16 },
}

impl ApiError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network(message.into())
    }

    /// Create a body read error
    pub fn body(status: u16, message: impl Into<String>) -> Self {
        ApiError::Body {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code associated with this error, if a response arrived
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Body { status, .. } | ApiError::EmptyFailure { status } => Some(*status),
            ApiError::ClientBuild(_) | ApiError::Network(_) => None,
        }
    }
}
