//! HTTP routes.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::Router;

use crate::state::AppState;

/// Build the application router.
pub fn router() -> Router<AppState> {
    Router::new().route("/callback", post(callback))
}

/// Webhook endpoint.
///
/// The signature is computed over the raw body, so the body is taken as
/// bytes and decoded only after verification. The response is HTTP 200
/// `"OK"` regardless of processing outcome.
async fn callback(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> &'static str {
    let signature = headers
        .get("X-Line-Signature")
        .and_then(|value| value.to_str().ok());

    state.relay.handle_delivery(signature, &body).await
}
