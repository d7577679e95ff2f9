//! Bounded per-user conversation history.
//!
//! The relay keeps the five most recent messages per user as conversational
//! context. This crate provides:
//!
//! - [`HistoryWindow`] - A fixed five-slot view of a user's recent messages
//! - [`HistoryStore`] - The trait both backends implement
//! - [`MemoryHistoryStore`] - Transient in-process buffers, lost on restart
//! - [`SqliteHistoryStore`] - Durable append-only log, truncated at read time
//!
//! # Example
//!
//! ```rust
//! use history_store::{HistoryStore, MemoryHistoryStore};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), history_store::StorageError> {
//!     let store = MemoryHistoryStore::new();
//!     let window = store.append_and_fetch("U1", "hello").await?;
//!     assert_eq!(window.slots()[4], "hello");
//!     Ok(())
//! }
//! ```

mod error;
mod memory;
mod sqlite;
mod window;

pub use error::StorageError;
pub use memory::MemoryHistoryStore;
pub use sqlite::{HistoryEntry, SqliteHistoryStore};
pub use window::{HistoryWindow, WINDOW_SIZE};

// Re-export async_trait for implementors.
pub use async_trait::async_trait;

/// Per-user message history with a bounded read window.
///
/// Implementations must keep each user's history independent: concurrent
/// requests for different users proceed without contention, while
/// [`append_and_fetch`](HistoryStore::append_and_fetch) for a single user
/// must not lose updates when two requests race.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Record one message for a user.
    async fn append(&self, user_id: &str, message: &str) -> Result<(), StorageError>;

    /// Fetch the most recent messages for a user as a fixed window,
    /// oldest first, newest last.
    async fn fetch_last(&self, user_id: &str) -> Result<HistoryWindow, StorageError>;

    /// Record one message and return the window including it.
    ///
    /// The default implementation appends then fetches; backends with
    /// mutable buffers should override this to make the pair atomic for
    /// a given user.
    async fn append_and_fetch(
        &self,
        user_id: &str,
        message: &str,
    ) -> Result<HistoryWindow, StorageError> {
        self.append(user_id, message).await?;
        self.fetch_last(user_id).await
    }
}
