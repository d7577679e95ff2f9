//! Completion API client.

use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::CompletionConfig;
use crate::error::CompletionError;

/// Thin client over a hosted chat-completion endpoint.
///
/// The configured timeout is applied at the HTTP-client level, so a hung
/// upstream surfaces as [`CompletionError::Timeout`] rather than stalling
/// the request pipeline.
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CompletionError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Request a completion for the given message sequence.
    ///
    /// Returns the trimmed content of the first choice.
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            temperature: Some(self.config.temperature),
        };

        debug!("Sending completion request: {:?}", request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(self.config.timeout)
                } else {
                    CompletionError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Prefer the structured error message when the body parses.
            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.message,
                Err(_) => error_text,
            };

            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            CompletionError::MalformedResponse(format!("Failed to parse response: {}", e))
        })?;

        debug!("Received completion response: {:?}", completion);

        let text = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                CompletionError::MalformedResponse("no content in first choice".to_string())
            })?;

        Ok(text)
    }
}
