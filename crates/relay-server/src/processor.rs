//! Per-event processing pipeline.
//!
//! One inbound webhook delivery is verified, decoded, and each text
//! message event walks the same sequence: resolve the sender's display
//! name, extend their history window, build the prompt, call the
//! completion API, reply. Failures past signature verification degrade
//! rather than abort; the sender either gets the generated reply or the
//! fixed fallback text.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use completion::{build_prompt, ChatMessage, CompletionClient, CompletionError};
use history_store::{HistoryStore, HistoryWindow};
use line_gateway::{Event, GatewayError, LineClient, WebhookPayload};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Reply sent when the completion call fails for any reason.
pub const FALLBACK_REPLY: &str = "Oops, something went wrong. Please try again later.";

/// Addressee used when the profile lookup fails.
pub const PLACEHOLDER_NAME: &str = "user";

/// Inbound and outbound side of the messaging platform.
#[async_trait]
pub trait Messaging: Send + Sync {
    /// Validate a webhook signature against the raw body.
    fn verify_signature(&self, body: &[u8], signature: &str) -> bool;

    /// Look up a user's display name.
    async fn display_name(&self, user_id: &str) -> Result<String, GatewayError>;

    /// Send one reply for a webhook event.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), GatewayError>;
}

#[async_trait]
impl Messaging for LineClient {
    fn verify_signature(&self, body: &[u8], signature: &str) -> bool {
        LineClient::verify_signature(self, body, signature)
    }

    async fn display_name(&self, user_id: &str) -> Result<String, GatewayError> {
        Ok(self.get_profile(user_id).await?.display_name)
    }

    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), GatewayError> {
        self.reply_message(reply_token, text).await
    }
}

/// The completion API seam.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, CompletionError>;
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
        CompletionClient::complete(self, messages).await
    }
}

/// Result of processing a single webhook event.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// A reply was delivered.
    Replied { user_id: String, reply: String },
    /// A reply was generated but could not be delivered.
    DeliveryFailed { user_id: String, error: String },
    /// Event was ignored (not a text message, missing fields, ...).
    Skipped { reason: String },
}

/// The webhook relay pipeline.
pub struct Relay<M, C> {
    messaging: M,
    completion: C,
    history: Arc<dyn HistoryStore>,
    bot_name: String,
    bot_role: String,
    completion_timeout: Duration,
    /// Memoized display names. Failed lookups are not cached, so a
    /// later message retries the profile fetch.
    names: RwLock<HashMap<String, String>>,
}

impl<M: Messaging, C: CompletionBackend> Relay<M, C> {
    /// Create a new relay pipeline.
    pub fn new(
        messaging: M,
        completion: C,
        history: Arc<dyn HistoryStore>,
        bot_name: impl Into<String>,
        bot_role: impl Into<String>,
        completion_timeout: Duration,
    ) -> Self {
        Self {
            messaging,
            completion,
            history,
            bot_name: bot_name.into(),
            bot_role: bot_role.into(),
            completion_timeout,
            names: RwLock::new(HashMap::new()),
        }
    }

    /// Handle one raw webhook delivery.
    ///
    /// Always returns the `"OK"` body; the platform gets HTTP 200 even
    /// on a bad signature so it neither retries nor learns anything
    /// about the verification.
    pub async fn handle_delivery(&self, signature: Option<&str>, body: &[u8]) -> &'static str {
        let Some(signature) = signature else {
            warn!("Webhook delivery without X-Line-Signature header, ignoring");
            return "OK";
        };

        if !self.messaging.verify_signature(body, signature) {
            warn!("Webhook signature verification failed, ignoring delivery");
            return "OK";
        }

        let payload: WebhookPayload = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to decode webhook payload: {}", e);
                return "OK";
            }
        };

        for event in &payload.events {
            match self.process_event(event).await {
                ProcessOutcome::Replied { user_id, .. } => {
                    info!(user_id = %user_id, "Replied to message");
                }
                ProcessOutcome::DeliveryFailed { user_id, error } => {
                    error!(user_id = %user_id, "Failed to reply to the user: {}", error);
                }
                ProcessOutcome::Skipped { reason } => {
                    debug!("Skipped event: {}", reason);
                }
            }
        }

        "OK"
    }

    /// Process one decoded webhook event.
    pub async fn process_event(&self, event: &Event) -> ProcessOutcome {
        let Some(text_event) = event.as_text_message() else {
            return ProcessOutcome::Skipped {
                reason: format!("not a text message event (type: {})", event.event_type),
            };
        };

        let user_id = text_event.user_id;
        debug!(user_id = %user_id, "Processing message: {}", text_event.text);

        let user_name = self.resolve_name(user_id).await;

        // Storage failure degrades to an empty context window rather
        // than dropping the request; the user still gets a reply.
        let window = match self.history.append_and_fetch(user_id, text_event.text).await {
            Ok(window) => window,
            Err(e) => {
                error!(user_id = %user_id, "History append failed, continuing with empty context: {}", e);
                HistoryWindow::empty()
            }
        };

        let messages = build_prompt(
            &self.bot_name,
            &self.bot_role,
            &user_name,
            &window,
            text_event.text,
        );

        let reply = match timeout(self.completion_timeout, self.completion.complete(messages)).await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                error!(user_id = %user_id, "Completion failed: {}", e);
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                error!(
                    user_id = %user_id,
                    "Completion timed out after {:?}", self.completion_timeout
                );
                FALLBACK_REPLY.to_string()
            }
        };

        // At-most-once delivery: a failed reply is logged, never retried.
        if let Err(e) = self.messaging.reply(text_event.reply_token, &reply).await {
            return ProcessOutcome::DeliveryFailed {
                user_id: user_id.to_string(),
                error: e.to_string(),
            };
        }

        ProcessOutcome::Replied {
            user_id: user_id.to_string(),
            reply,
        }
    }

    /// Cache-or-fetch the sender's display name.
    async fn resolve_name(&self, user_id: &str) -> String {
        {
            let names = self.names.read().await;
            if let Some(name) = names.get(user_id) {
                return name.clone();
            }
        }

        match self.messaging.display_name(user_id).await {
            Ok(name) => {
                let mut names = self.names.write().await;
                names.insert(user_id.to_string(), name.clone());
                name
            }
            Err(e) => {
                error!(user_id = %user_id, "Profile lookup failed: {}", e);
                PLACEHOLDER_NAME.to_string()
            }
        }
    }
}
