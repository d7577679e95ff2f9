//! Chat-completion API client and prompt construction.
//!
//! This crate covers the outbound half of the relay pipeline:
//!
//! - [`build_prompt`] - Pure assembly of the role-tagged message sequence
//! - [`CompletionClient`] - Thin `reqwest` wrapper over a hosted
//!   chat-completion endpoint
//! - [`CompletionConfig`] - Environment-sourced settings with a builder
//!   for tests

mod api_types;
mod client;
mod config;
mod error;
mod prompt;

pub use api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use client::CompletionClient;
pub use config::{CompletionConfig, CompletionConfigBuilder};
pub use error::CompletionError;
pub use prompt::build_prompt;
