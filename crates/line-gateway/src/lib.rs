//! LINE Messaging API collaborator.
//!
//! Handles inbound payloads from LINE webhooks and outbound calls back to
//! the platform:
//!
//! - [`verify_signature`] / [`sign`] - `X-Line-Signature` HMAC validation
//! - [`WebhookPayload`] / [`Event`] - Webhook event deserialization
//! - [`LineClient`] - Profile lookup and reply delivery over HTTPS

mod client;
mod error;
mod events;
mod signature;

pub use client::{LineClient, Profile};
pub use error::GatewayError;
pub use events::{Event, MessageContent, Source, TextMessageEvent, WebhookPayload};
pub use signature::{sign, verify_signature};
