//! Configuration for the completion client.

use std::env;
use std::time::Duration;

use crate::error::CompletionError;

/// Default chat-completion model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`crate::CompletionClient`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Completion API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Temperature for generation.
    pub temperature: f32,

    /// Timeout applied to each completion request. Expiry is treated as
    /// the generic completion failure path by callers.
    pub timeout: Duration,

    /// Name the bot introduces itself with.
    pub bot_name: String,

    /// Role description the bot adopts.
    pub bot_role: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            timeout: DEFAULT_TIMEOUT,
            bot_name: "Assistant".to_string(),
            bot_role: "helpful assistant".to_string(),
        }
    }
}

impl CompletionConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `COMPLETION_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `COMPLETION_API_URL` - API base URL (default: https://api.openai.com)
    /// - `COMPLETION_MODEL` - Model name (default: gpt-3.5-turbo)
    /// - `COMPLETION_TEMPERATURE` - Temperature (default: 0.7)
    /// - `COMPLETION_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
    /// - `BOT_NAME` - Bot display name (default: Assistant)
    /// - `BOT_ROLE` - Bot role description (default: helpful assistant)
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = env::var("COMPLETION_API_KEY")
            .map_err(|_| CompletionError::Configuration("COMPLETION_API_KEY not set".to_string()))?;

        let api_url =
            env::var("COMPLETION_API_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());

        let model = env::var("COMPLETION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let temperature = env::var("COMPLETION_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.7);

        let timeout = env::var("COMPLETION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let bot_name = env::var("BOT_NAME").unwrap_or_else(|_| "Assistant".to_string());

        let bot_role = env::var("BOT_ROLE").unwrap_or_else(|_| "helpful assistant".to_string());

        Ok(Self {
            api_url,
            api_key,
            model,
            temperature,
            timeout,
            bot_name,
            bot_role,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> CompletionConfigBuilder {
        CompletionConfigBuilder::default()
    }
}

/// Builder for [`CompletionConfig`].
#[derive(Debug, Default)]
pub struct CompletionConfigBuilder {
    config: CompletionConfig,
}

impl CompletionConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the bot name.
    pub fn bot_name(mut self, name: impl Into<String>) -> Self {
        self.config.bot_name = name.into();
        self
    }

    /// Set the bot role.
    pub fn bot_role(mut self, role: impl Into<String>) -> Self {
        self.config.bot_role = role.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> CompletionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompletionConfig::default();

        assert_eq!(config.api_url, "https://api.openai.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_all_options() {
        let config = CompletionConfig::builder()
            .api_key("my-key")
            .api_url("https://custom.api.com")
            .model("gpt-4")
            .temperature(0.5)
            .timeout(Duration::from_secs(10))
            .bot_name("Aki")
            .bot_role("tour guide")
            .build();

        assert_eq!(config.api_key, "my-key");
        assert_eq!(config.api_url, "https://custom.api.com");
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.bot_name, "Aki");
        assert_eq!(config.bot_role, "tour guide");
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            std::env::remove_var("COMPLETION_API_KEY");
            std::env::remove_var("COMPLETION_API_URL");
            std::env::remove_var("COMPLETION_MODEL");
            std::env::remove_var("COMPLETION_TEMPERATURE");
            std::env::remove_var("COMPLETION_TIMEOUT_SECS");
            std::env::remove_var("BOT_NAME");
            std::env::remove_var("BOT_ROLE");
        }

        // Missing API key should error.
        clear_vars();
        let result = CompletionConfig::from_env();
        match result {
            Err(CompletionError::Configuration(msg)) => {
                assert!(msg.contains("COMPLETION_API_KEY"));
            }
            other => panic!("expected Configuration error, got {:?}", other.map(|_| ())),
        }

        // Only API key set, defaults used.
        clear_vars();
        std::env::set_var("COMPLETION_API_KEY", "test-env-key");

        let config = CompletionConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-env-key");
        assert_eq!(config.api_url, "https://api.openai.com");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);

        // All vars set.
        clear_vars();
        std::env::set_var("COMPLETION_API_KEY", "full-test-key");
        std::env::set_var("COMPLETION_API_URL", "https://test.api.com");
        std::env::set_var("COMPLETION_MODEL", "gpt-4");
        std::env::set_var("COMPLETION_TEMPERATURE", "0.9");
        std::env::set_var("COMPLETION_TIMEOUT_SECS", "5");
        std::env::set_var("BOT_NAME", "Aki");
        std::env::set_var("BOT_ROLE", "tour guide");

        let config = CompletionConfig::from_env().unwrap();
        assert_eq!(config.api_key, "full-test-key");
        assert_eq!(config.api_url, "https://test.api.com");
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.temperature, 0.9);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.bot_name, "Aki");
        assert_eq!(config.bot_role, "tour guide");

        clear_vars();
    }
}
