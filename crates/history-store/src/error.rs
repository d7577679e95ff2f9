//! Storage error types.

use thiserror::Error;

/// Errors that can occur while reading or writing history.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLx error (connection, query, etc.)
    #[error("storage error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
