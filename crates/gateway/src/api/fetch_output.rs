//! Output retrieval endpoint: POST /api/fetch-output

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use ar_domain::error::Error;

use super::{api_error, missing_key_message};
use crate::output::{fetch_latest_output, FetchOutputError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutputRequest {
    #[serde(default)]
    pub agent_id: Option<String>,
}

/// POST /api/fetch-output
pub async fn fetch_output(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(bey) = state.bey.clone() else {
        return api_error(StatusCode::INTERNAL_SERVER_ERROR, missing_key_message(&state));
    };

    let req: FetchOutputRequest = serde_json::from_slice(&body).unwrap_or_default();
    let Some(agent_id) = req.agent_id.filter(|s| !s.trim().is_empty()) else {
        return api_error(StatusCode::BAD_REQUEST, "agentId required in body");
    };

    match fetch_latest_output(bey.as_ref(), &agent_id).await {
        Ok(found) => Json(json!({
            "callId": found.call_id,
            "output": found.output,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(err: FetchOutputError) -> Response {
    match err {
        FetchOutputError::NoEndedCall { .. } => {
            api_error(StatusCode::NOT_FOUND, err.to_string())
        }
        FetchOutputError::NoStructuredOutput { ref messages, .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": err.to_string(),
                "messages": messages,
            })),
        )
            .into_response(),
        FetchOutputError::ListCalls(ref source)
        | FetchOutputError::ListMessages { ref source, .. } => match source {
            Error::Upstream { status, body, .. } => {
                let what = if matches!(err, FetchOutputError::ListCalls(_)) {
                    "calls"
                } else {
                    "messages"
                };
                tracing::warn!(status, what, "upstream listing failed");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "error": format!("Failed fetching {what}: {status}"),
                        "detail": body,
                    })),
                )
                    .into_response()
            }
            other => {
                tracing::error!(error = %other, "output fetch failed");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        },
    }
}
