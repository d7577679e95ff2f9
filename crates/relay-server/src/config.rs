//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which history backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    /// In-process buffers, lost on restart.
    Memory,
    /// Durable SQLite log.
    Sqlite,
}

/// Certificate and key paths for direct TLS termination.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Relay server configuration.
///
/// Completion-API settings are loaded separately by
/// [`completion::CompletionConfig::from_env`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// LINE channel access token.
    pub channel_access_token: String,
    /// LINE channel secret for webhook signature checks.
    pub channel_secret: String,
    /// History backend selection.
    pub history_backend: HistoryBackend,
    /// SQLite URL for the durable backend.
    pub history_db_url: String,
    /// Optional direct TLS termination.
    pub tls: Option<TlsConfig>,
    /// Append-mode file receiving error-level log records. `None`
    /// only when explicitly disabled.
    pub error_log_path: Option<PathBuf>,
}

/// Default durable error log file.
const DEFAULT_ERROR_LOG: &str = "error.log";

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BIND_ADDR` | Server bind address | `0.0.0.0:5000` |
    /// | `CHANNEL_ACCESS_TOKEN` | LINE channel access token | (required) |
    /// | `CHANNEL_SECRET` | LINE channel secret | (required) |
    /// | `HISTORY_BACKEND` | `memory` or `sqlite` | `memory` |
    /// | `HISTORY_DB_URL` | SQLite URL for the durable backend | `sqlite:history.db?mode=rwc` |
    /// | `TLS_CERT_PATH` | TLS certificate chain file | (none) |
    /// | `TLS_KEY_PATH` | TLS private key file | (none) |
    /// | `ERROR_LOG_PATH` | Durable error log file, `none` disables | `error.log` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let channel_access_token =
            env::var("CHANNEL_ACCESS_TOKEN").map_err(|_| ConfigError::MissingAccessToken)?;

        let channel_secret =
            env::var("CHANNEL_SECRET").map_err(|_| ConfigError::MissingChannelSecret)?;

        let history_backend = match env::var("HISTORY_BACKEND") {
            Err(_) => HistoryBackend::Memory,
            Ok(value) => match value.to_lowercase().as_str() {
                "memory" => HistoryBackend::Memory,
                "sqlite" => HistoryBackend::Sqlite,
                other => return Err(ConfigError::InvalidHistoryBackend(other.to_string())),
            },
        };

        let history_db_url = env::var("HISTORY_DB_URL")
            .unwrap_or_else(|_| "sqlite:history.db?mode=rwc".to_string());

        let tls = match (env::var("TLS_CERT_PATH").ok(), env::var("TLS_KEY_PATH").ok()) {
            (Some(cert), Some(key)) => Some(TlsConfig {
                cert_path: PathBuf::from(cert),
                key_path: PathBuf::from(key),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialTls),
        };

        // Errors are written to a durable log by default; opting out is
        // explicit.
        let error_log_path = match env::var("ERROR_LOG_PATH") {
            Err(_) => Some(PathBuf::from(DEFAULT_ERROR_LOG)),
            Ok(value) if value.is_empty() || value.eq_ignore_ascii_case("none") => None,
            Ok(value) => Some(PathBuf::from(value)),
        };

        Ok(Self {
            addr,
            channel_access_token,
            channel_secret,
            history_backend,
            history_db_url,
            tls,
            error_log_path,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR format")]
    InvalidAddr,

    #[error("CHANNEL_ACCESS_TOKEN environment variable is required")]
    MissingAccessToken,

    #[error("CHANNEL_SECRET environment variable is required")]
    MissingChannelSecret,

    #[error("Unknown HISTORY_BACKEND: {0} (expected \"memory\" or \"sqlite\")")]
    InvalidHistoryBackend(String),

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    PartialTls,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            std::env::remove_var("BIND_ADDR");
            std::env::remove_var("CHANNEL_ACCESS_TOKEN");
            std::env::remove_var("CHANNEL_SECRET");
            std::env::remove_var("HISTORY_BACKEND");
            std::env::remove_var("HISTORY_DB_URL");
            std::env::remove_var("TLS_CERT_PATH");
            std::env::remove_var("TLS_KEY_PATH");
            std::env::remove_var("ERROR_LOG_PATH");
        }

        // Missing access token is fatal.
        clear_vars();
        std::env::set_var("CHANNEL_SECRET", "secret");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingAccessToken)
        ));

        // Missing channel secret is fatal.
        clear_vars();
        std::env::set_var("CHANNEL_ACCESS_TOKEN", "token");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingChannelSecret)
        ));

        // Defaults.
        clear_vars();
        std::env::set_var("CHANNEL_ACCESS_TOKEN", "token");
        std::env::set_var("CHANNEL_SECRET", "secret");

        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "0.0.0.0:5000");
        assert_eq!(config.history_backend, HistoryBackend::Memory);
        assert_eq!(config.history_db_url, "sqlite:history.db?mode=rwc");
        assert!(config.tls.is_none());
        // The durable error log is on by default.
        assert_eq!(config.error_log_path, Some(PathBuf::from("error.log")));

        // Sqlite backend and TLS pair.
        std::env::set_var("HISTORY_BACKEND", "sqlite");
        std::env::set_var("TLS_CERT_PATH", "/etc/tls/fullchain.pem");
        std::env::set_var("TLS_KEY_PATH", "/etc/tls/privkey.pem");

        let config = Config::from_env().unwrap();
        assert_eq!(config.history_backend, HistoryBackend::Sqlite);
        let tls = config.tls.unwrap();
        assert_eq!(tls.cert_path, PathBuf::from("/etc/tls/fullchain.pem"));
        assert_eq!(tls.key_path, PathBuf::from("/etc/tls/privkey.pem"));

        // Error log path can be overridden or explicitly disabled.
        std::env::set_var("ERROR_LOG_PATH", "logs/relay-errors.log");
        let config = Config::from_env().unwrap();
        assert_eq!(
            config.error_log_path,
            Some(PathBuf::from("logs/relay-errors.log"))
        );

        std::env::set_var("ERROR_LOG_PATH", "none");
        let config = Config::from_env().unwrap();
        assert!(config.error_log_path.is_none());
        std::env::remove_var("ERROR_LOG_PATH");

        // TLS paths must come as a pair.
        std::env::remove_var("TLS_KEY_PATH");
        assert!(matches!(Config::from_env(), Err(ConfigError::PartialTls)));

        // Unknown backend is rejected.
        std::env::remove_var("TLS_CERT_PATH");
        std::env::set_var("HISTORY_BACKEND", "redis");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidHistoryBackend(_))
        ));

        clear_vars();
    }
}
