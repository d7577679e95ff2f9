//! LINE platform HTTP client.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::GatewayError;
use crate::signature;

/// Default LINE platform API base URL.
const DEFAULT_API_URL: &str = "https://api.line.me";

/// A user's public profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// The user's display name.
    pub display_name: String,
}

/// Client for the LINE Messaging API.
///
/// Holds the channel access token for outbound calls and the channel
/// secret for webhook signature checks.
#[derive(Debug, Clone)]
pub struct LineClient {
    client: Client,
    api_url: String,
    access_token: String,
    channel_secret: String,
}

impl LineClient {
    /// Create a client with the given channel credentials.
    pub fn new(
        access_token: impl Into<String>,
        channel_secret: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().build().map_err(|e| {
            GatewayError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            access_token: access_token.into(),
            channel_secret: channel_secret.into(),
        })
    }

    /// Override the platform API base URL. Used by tests.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Validate an `X-Line-Signature` header against a raw request body.
    pub fn verify_signature(&self, body: &[u8], signature: &str) -> bool {
        signature::verify_signature(&self.channel_secret, body, signature)
    }

    /// Fetch a user's profile.
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, GatewayError> {
        let url = format!("{}/v2/bot/profile/{}", self.api_url, user_id);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Profile request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Profile>()
            .await
            .map_err(|e| GatewayError::Network(format!("Failed to parse profile: {}", e)))
    }

    /// Send a single text reply for a webhook event.
    ///
    /// The reply token is event-scoped and single-use; delivery is
    /// at-most-once and the caller decides what to do on failure.
    pub async fn reply_message(&self, reply_token: &str, text: &str) -> Result<(), GatewayError> {
        let url = format!("{}/v2/bot/message/reply", self.api_url);

        let body = json!({
            "replyToken": reply_token,
            "messages": [{"type": "text", "text": text}],
        });

        debug!("Sending reply: {}", body);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("Reply request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
