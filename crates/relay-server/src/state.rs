//! Application state shared across handlers.

use std::sync::Arc;

use completion::CompletionClient;
use line_gateway::LineClient;

use crate::processor::Relay;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The relay pipeline.
    pub relay: Arc<Relay<LineClient, CompletionClient>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(relay: Relay<LineClient, CompletionClient>) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}
