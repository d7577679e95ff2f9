//! Transient in-memory history backend.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::error::StorageError;
use crate::window::{HistoryWindow, WINDOW_SIZE};
use crate::HistoryStore;

/// In-process per-user ring buffers, capacity five, lost on restart.
///
/// Each user gets their own mutex so append+fetch is atomic per user
/// without serializing unrelated users. The outer map lock is held only
/// long enough to look up or insert a buffer handle.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    buffers: RwLock<HashMap<String, Arc<Mutex<VecDeque<String>>>>>,
}

impl MemoryHistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the buffer handle for a user, creating it if absent.
    async fn buffer(&self, user_id: &str) -> Arc<Mutex<VecDeque<String>>> {
        {
            let buffers = self.buffers.read().await;
            if let Some(buffer) = buffers.get(user_id) {
                return buffer.clone();
            }
        }

        let mut buffers = self.buffers.write().await;
        buffers
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(VecDeque::with_capacity(WINDOW_SIZE))))
            .clone()
    }

    /// Number of users with buffered history.
    pub async fn user_count(&self) -> usize {
        self.buffers.read().await.len()
    }

    fn push_bounded(buffer: &mut VecDeque<String>, message: &str) {
        if buffer.len() == WINDOW_SIZE {
            buffer.pop_front();
        }
        buffer.push_back(message.to_string());
    }

    fn window_of(buffer: &VecDeque<String>) -> HistoryWindow {
        let messages: Vec<String> = buffer.iter().cloned().collect();
        HistoryWindow::from_chronological(&messages)
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, user_id: &str, message: &str) -> Result<(), StorageError> {
        let buffer = self.buffer(user_id).await;
        let mut buffer = buffer.lock().await;
        Self::push_bounded(&mut buffer, message);
        Ok(())
    }

    async fn fetch_last(&self, user_id: &str) -> Result<HistoryWindow, StorageError> {
        let buffer = self.buffer(user_id).await;
        let buffer = buffer.lock().await;
        Ok(Self::window_of(&buffer))
    }

    async fn append_and_fetch(
        &self,
        user_id: &str,
        message: &str,
    ) -> Result<HistoryWindow, StorageError> {
        let buffer = self.buffer(user_id).await;
        // One lock across append and read so a racing request for the
        // same user cannot observe or produce a torn window.
        let mut buffer = buffer.lock().await;
        Self::push_bounded(&mut buffer, message);
        Ok(Self::window_of(&buffer))
    }
}
