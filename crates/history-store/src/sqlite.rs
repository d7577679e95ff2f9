//! Durable SQLite history backend.
//!
//! Appends are unconditional; the five-message bound is applied at read
//! time with `ORDER BY timestamp DESC, seq DESC LIMIT 5`. The `seq`
//! column is the tie-breaker for writes that land within the same
//! timestamp granularity, so insertion order is preserved.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};

use crate::error::StorageError;
use crate::window::{HistoryWindow, WINDOW_SIZE};
use crate::HistoryStore;

/// Default pool size. One short transaction per append keeps
/// connections cheap; this only needs to cover concurrent requests.
const DEFAULT_POOL_SIZE: u32 = 5;

/// A recorded history row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    /// Auto-incrementing sequence number, monotonic per insert.
    pub seq: i64,
    /// Platform-assigned user identifier.
    pub user_id: String,
    /// Message text as received.
    pub message: String,
    /// RFC 3339 timestamp of the append.
    pub timestamp: String,
}

/// Append-only history log backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(DEFAULT_POOL_SIZE)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to history database: {}", url);

        Ok(Self { pool })
    }

    /// Create the history table if it does not exist.
    ///
    /// Call once after connecting.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                message TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_history_user_seq
            ON history (user_id, seq)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetch the most recent full rows for a user, newest first.
    pub async fn recent_entries(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<HistoryEntry>, StorageError> {
        let entries = sqlx::query_as::<_, HistoryEntry>(
            r#"
            SELECT seq, user_id, message, timestamp
            FROM history
            WHERE user_id = ?
            ORDER BY timestamp DESC, seq DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, user_id: &str, message: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO history (user_id, message, timestamp)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(message)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_last(&self, user_id: &str) -> Result<HistoryWindow, StorageError> {
        let mut messages: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT message
            FROM history
            WHERE user_id = ?
            ORDER BY timestamp DESC, seq DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(WINDOW_SIZE as i64)
        .fetch_all(&self.pool)
        .await?;

        // The query returns newest-first; the window is chronological.
        messages.reverse();
        Ok(HistoryWindow::from_chronological(&messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteHistoryStore {
        let store = SqliteHistoryStore::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_first_message_padded() {
        let store = test_store().await;

        let window = store.append_and_fetch("U1", "hello").await.unwrap();
        assert_eq!(window.slots(), &["", "", "", "", "hello"]);
    }

    #[tokio::test]
    async fn test_read_time_truncation() {
        let store = test_store().await;

        for i in 1..=6 {
            store.append("U1", &format!("m{}", i)).await.unwrap();
        }

        let window = store.fetch_last("U1").await.unwrap();
        assert_eq!(window.slots(), &["m2", "m3", "m4", "m5", "m6"]);

        // The log itself is unbounded.
        let entries = store.recent_entries("U1", 100).await.unwrap();
        assert_eq!(entries.len(), 6);
    }

    #[tokio::test]
    async fn test_same_timestamp_orders_by_seq() {
        let store = test_store().await;

        // Force identical timestamp text so only seq can break the tie.
        for text in ["first", "second", "third"] {
            sqlx::query("INSERT INTO history (user_id, message, timestamp) VALUES (?, ?, ?)")
                .bind("U1")
                .bind(text)
                .bind("2024-01-01T00:00:00+00:00")
                .execute(store.pool())
                .await
                .unwrap();
        }

        let window = store.fetch_last("U1").await.unwrap();
        assert_eq!(window.slots(), &["", "", "first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let store = test_store().await;

        store.append("U1", "from one").await.unwrap();
        store.append("U2", "from two").await.unwrap();

        let w1 = store.fetch_last("U1").await.unwrap();
        let w2 = store.fetch_last("U2").await.unwrap();

        assert_eq!(w1.slots()[4], "from one");
        assert_eq!(w2.slots()[4], "from two");
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = test_store().await;
        store.migrate().await.unwrap();
        store.append("U1", "still works").await.unwrap();
    }
}
