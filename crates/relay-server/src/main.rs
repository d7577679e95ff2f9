//! LINE webhook relay server.
//!
//! Receives text messages from the LINE Messaging API webhook, keeps a
//! five-message rolling history per user, forwards the context to a
//! chat-completion API, and relays the generated reply back.

mod config;
mod processor;
mod routes;
mod state;

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use completion::{CompletionClient, CompletionConfig};
use history_store::{HistoryStore, MemoryHistoryStore, SqliteHistoryStore};
use line_gateway::LineClient;
use tracing::info;

use crate::config::{Config, HistoryBackend};
use crate::processor::Relay;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logging(config.error_log_path.as_deref())?;

    info!(addr = %config.addr, "Starting relay server");

    // History backend
    let history: Arc<dyn HistoryStore> = match config.history_backend {
        HistoryBackend::Memory => {
            info!("Using in-memory history backend");
            Arc::new(MemoryHistoryStore::new())
        }
        HistoryBackend::Sqlite => {
            info!(url = %config.history_db_url, "Using SQLite history backend");
            let store = SqliteHistoryStore::connect(&config.history_db_url).await?;
            store.migrate().await?;
            Arc::new(store)
        }
    };

    // Completion client; missing COMPLETION_API_KEY is fatal here.
    let completion_config = CompletionConfig::from_env()?;
    let bot_name = completion_config.bot_name.clone();
    let bot_role = completion_config.bot_role.clone();
    let completion_timeout = completion_config.timeout;
    let completion = CompletionClient::new(completion_config)?;

    // Messaging gateway
    let gateway = LineClient::new(&config.channel_access_token, &config.channel_secret)?;

    let relay = Relay::new(
        gateway,
        completion,
        history,
        bot_name,
        bot_role,
        completion_timeout,
    );

    let state = AppState::new(relay);
    let app = routes::router().with_state(state);

    match &config.tls {
        Some(tls) => {
            let rustls =
                RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
            info!(addr = %config.addr, "Relay server listening (TLS)");
            axum_server::bind_rustls(config.addr, rustls)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!(addr = %config.addr, "Relay server listening");
            let listener = tokio::net::TcpListener::bind(config.addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Initialize tracing output.
///
/// Everything goes to stdout; when an error log path is configured,
/// error-level records are additionally appended to that file so
/// failures survive restarts.
fn init_logging(error_log: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    match error_log {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Arc::new(file))
                        .with_filter(LevelFilter::ERROR),
                )
                .init();
        }
        None => {
            tracing_subscriber::fmt::init();
        }
    }

    Ok(())
}
