//! Completion error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while requesting a completion.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure reaching the API.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured bound.
    #[error("completion request timed out after {0:?}")]
    Timeout(Duration),

    /// The API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API returned a body that could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
