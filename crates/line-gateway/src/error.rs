//! Gateway error types.

use thiserror::Error;

/// Errors from calls to the LINE platform API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure reaching the platform.
    #[error("network error: {0}")]
    Network(String),

    /// The platform returned a non-success status.
    #[error("platform API error ({status}): {body}")]
    Api { status: u16, body: String },
}
