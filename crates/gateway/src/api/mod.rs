pub mod agents;
pub mod auth;
pub mod fetch_output;
pub mod health;
pub mod pages;
pub mod webhook;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::state::AppState;

/// Build the full router.
///
/// Pages and `/api/*` are **public**: the pages call the API from the
/// same origin without credentials. `/webhook` is **protected** by the
/// bearer-token middleware when `server.webhook_token_env` is set.
pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        // HTML pages
        .route("/", get(pages::index))
        .route("/avatar", get(pages::avatar))
        .route("/fetch-output", get(pages::fetch_output))
        // Health probe
        .route("/health", get(health::health))
        // JSON API
        .route("/api/create-agent", post(agents::create_agent))
        .route("/api/fetch-output", post(fetch_output::fetch_output));

    let protected = Router::new()
        .route("/webhook", post(webhook::receive))
        .route_layer(middleware::from_fn_with_state(
            state,
            auth::require_webhook_token,
        ));

    public.merge(protected)
}

/// `{ "error": message }` with the given status.
pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Message returned when the upstream API key is not configured.
pub(crate) fn missing_key_message(state: &AppState) -> String {
    format!("Missing {} on server", state.config.bey.api_key_env)
}
