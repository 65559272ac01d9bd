//! Unified error types for the responder.
//!
//! The only real failure path in this crate is the outbound send: malformed
//! inbound events classify as `Unclassified` and unmatched command text is a
//! handler declining, neither of which is an error.

use thiserror::Error;

/// Result type for outbound API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the outbound messaging collaborator.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The bot is not connected to its transport.
    #[error("bot is not connected")]
    NotConnected,

    /// The API call timed out.
    #[error("API call timed out")]
    Timeout,

    /// The platform returned an error response.
    #[error("API error ({retcode}): {message}")]
    Api {
        /// Platform return code.
        retcode: i32,
        /// Platform error message.
        message: String,
    },

    /// Failed to serialize or deserialize a payload.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ApiError {
    /// Creates an `Other` error from any message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
