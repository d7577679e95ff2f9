//! Webhook event deserialization.
//!
//! One delivery carries a batch of events. Only `message` events whose
//! message type is `text` are processed; everything else (follow,
//! unfollow, postback, stickers, ...) is ignored upstream.

use serde::Deserialize;

/// Top-level webhook delivery body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Events in this delivery. LINE may send an empty batch as a
    /// verification ping.
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A single webhook event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event type: "message", "follow", "unfollow", "postback", ...
    #[serde(rename = "type")]
    pub event_type: String,

    /// One-time token for replying to this event.
    #[serde(default)]
    pub reply_token: Option<String>,

    /// Who triggered the event.
    #[serde(default)]
    pub source: Option<Source>,

    /// Message content, present on "message" events.
    #[serde(default)]
    pub message: Option<MessageContent>,
}

/// Event source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Source type: "user", "group", or "room".
    #[serde(rename = "type")]
    pub source_type: String,

    /// Platform-assigned user identifier.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Content of a message event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    /// Message type: "text", "image", "sticker", ...
    #[serde(rename = "type")]
    pub message_type: String,

    /// Message identifier.
    #[serde(default)]
    pub id: Option<String>,

    /// Text body, present on "text" messages.
    #[serde(default)]
    pub text: Option<String>,
}

/// Borrowed view of a processable text-message event.
#[derive(Debug, Clone, Copy)]
pub struct TextMessageEvent<'a> {
    /// Sender's user identifier.
    pub user_id: &'a str,
    /// One-time reply token for this event.
    pub reply_token: &'a str,
    /// The message text.
    pub text: &'a str,
}

impl Event {
    /// View this event as a text message, if it is one with a sender
    /// and reply token.
    pub fn as_text_message(&self) -> Option<TextMessageEvent<'_>> {
        if self.event_type != "message" {
            return None;
        }
        let message = self.message.as_ref()?;
        if message.message_type != "text" {
            return None;
        }
        Some(TextMessageEvent {
            user_id: self.source.as_ref()?.user_id.as_deref()?,
            reply_token: self.reply_token.as_deref()?,
            text: message.text.as_deref()?,
        })
    }
}
