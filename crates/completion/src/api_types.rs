//! Completion API request and response types.

use serde::{Deserialize, Serialize};

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model to use
    pub model: String,
    /// Messages in the conversation
    pub messages: Vec<ChatMessage>,
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Response choices
    pub choices: Vec<Choice>,
    /// Model used, when reported
    pub model: Option<String>,
    /// Token usage
    pub usage: Option<Usage>,
}

/// A response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// Choice index
    pub index: u32,
    /// The message
    pub message: ResponseMessage,
    /// Why generation stopped
    pub finish_reason: Option<String>,
}

/// Message within a response choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// Role (typically "assistant")
    pub role: String,
    /// Generated content, absent on some failure modes
    pub content: Option<String>,
}

/// Token usage statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Error response from the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Error details
    pub error: ApiErrorDetail,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Error message
    pub message: String,
    /// Error type, when reported
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}
