//! Call-event receiver: POST /webhook
//!
//! Accepts the upstream's call notifications, recovers the JSON block the
//! agent emitted during the call and saves it under `outputs.dir`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use ar_domain::error::Error;
use ar_domain::types::Message;

use crate::output::save_call_output;
use crate::state::AppState;

/// POST /webhook
pub async fn receive(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));
    tracing::info!(payload = %payload, "webhook payload received");

    let Some(call_id) = find_call_id(&payload) else {
        return reject(StatusCode::BAD_REQUEST, "no call id found in payload");
    };

    let messages: Vec<Message> = match payload.get("messages") {
        Some(raw) => match serde_json::from_value(raw.clone()) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(call_id = %call_id, error = %e, "webhook messages not understood");
                return reject(StatusCode::BAD_REQUEST, "messages must be a list of message objects");
            }
        },
        None => {
            let Some(bey) = state.bey.clone() else {
                return reject(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("missing {} on server", state.config.bey.api_key_env),
                );
            };
            match bey.list_messages(&call_id).await {
                Ok(m) => m,
                Err(Error::Upstream { status, .. }) => {
                    tracing::error!(call_id = %call_id, status, "failed fetching messages for webhook call");
                    return (
                        StatusCode::BAD_GATEWAY,
                        Json(json!({
                            "ok": false,
                            "reason": "failed fetching messages",
                            "status": status,
                        })),
                    )
                        .into_response();
                }
                Err(e) => {
                    tracing::error!(call_id = %call_id, error = %e, "failed fetching messages for webhook call");
                    return reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
                }
            }
        }
    };

    let full_text = ar_transcript::transcript_text(&messages);
    let Some(output) = ar_transcript::extract(&full_text) else {
        tracing::info!(call_id = %call_id, messages = messages.len(), "no JSON block found for webhook call");
        return reject(StatusCode::OK, "no JSON block found in messages");
    };

    match save_call_output(&state.config.outputs.dir, &call_id, &output) {
        Ok(path) => {
            tracing::info!(call_id = %call_id, path = %path.display(), "saved webhook output");
            Json(json!({ "ok": true, "saved": path.display().to_string() })).into_response()
        }
        Err(e) => {
            tracing::error!(call_id = %call_id, error = %e, "failed saving webhook output");
            reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// The call id from the first place it appears: `call_id`, `data.id`,
/// `call.id`, then `event.call_id`.
pub fn find_call_id(payload: &Value) -> Option<String> {
    [
        payload.get("call_id"),
        payload.pointer("/data/id"),
        payload.pointer("/call/id"),
        payload.pointer("/event/call_id"),
    ]
    .into_iter()
    .flatten()
    .find_map(id_text)
}

fn id_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn reject(status: StatusCode, reason: impl Into<String>) -> Response {
    (status, Json(json!({ "ok": false, "reason": reason.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_id_lookup_order() {
        let p = json!({"data": {"id": "d"}, "call": {"id": "c"}});
        assert_eq!(find_call_id(&p).as_deref(), Some("d"));

        let p = json!({"call_id": "top", "event": {"call_id": "e"}});
        assert_eq!(find_call_id(&p).as_deref(), Some("top"));

        let p = json!({"event": {"call_id": 17}});
        assert_eq!(find_call_id(&p).as_deref(), Some("17"));
    }

    #[test]
    fn empty_call_id_falls_through() {
        let p = json!({"call_id": "", "call": {"id": "c"}});
        assert_eq!(find_call_id(&p).as_deref(), Some("c"));
        assert!(find_call_id(&json!({"data": null})).is_none());
    }
}
