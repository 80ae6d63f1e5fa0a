//! Recovering a call's structured output. Shared by the HTTP handlers and
//! the CLI.

use std::path::{Path, PathBuf};

use ar_bey::BeyApi;
use ar_domain::error::Error;
use ar_domain::trace::TraceEvent;
use ar_domain::types::Message;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum FetchOutputError {
    #[error("No ended calls found for agent")]
    NoEndedCall { agent_id: String },

    #[error("No structured JSON found in messages")]
    NoStructuredOutput {
        call_id: String,
        messages: Vec<Message>,
    },

    #[error("Failed fetching calls: {0}")]
    ListCalls(#[source] Error),

    #[error("Failed fetching messages: {source}")]
    ListMessages {
        call_id: String,
        #[source]
        source: Error,
    },
}

/// The structured output of an agent's latest ended call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutput {
    pub call_id: String,
    pub output: Value,
    pub from_assistant: bool,
}

/// Resolve the agent's latest ended call, fetch its transcript and
/// extract the payload. Listing calls always happens before listing
/// messages.
pub async fn fetch_latest_output(
    bey: &dyn BeyApi,
    agent_id: &str,
) -> Result<CallOutput, FetchOutputError> {
    let calls = bey.list_calls().await.map_err(FetchOutputError::ListCalls)?;

    let call = ar_transcript::latest_ended_call(agent_id, &calls).ok_or_else(|| {
        FetchOutputError::NoEndedCall {
            agent_id: agent_id.to_owned(),
        }
    })?;
    TraceEvent::CallResolved {
        agent_id: agent_id.to_owned(),
        call_id: call.id.clone(),
        candidates: ar_transcript::ended_calls(agent_id, &calls).len(),
    }
    .emit();

    let messages = bey
        .list_messages(&call.id)
        .await
        .map_err(|source| FetchOutputError::ListMessages {
            call_id: call.id.clone(),
            source,
        })?;

    let selected = ar_transcript::select_output(&messages)
        .map(|s| (s.value, s.source.is_some()));
    match selected {
        Some((output, from_assistant)) => {
            TraceEvent::OutputExtracted {
                call_id: call.id.clone(),
                message_count: messages.len(),
                from_assistant,
            }
            .emit();
            Ok(CallOutput {
                call_id: call.id.clone(),
                output,
                from_assistant,
            })
        }
        None => {
            TraceEvent::OutputMissing {
                call_id: call.id.clone(),
                message_count: messages.len(),
            }
            .emit();
            Err(FetchOutputError::NoStructuredOutput {
                call_id: call.id.clone(),
                messages,
            })
        }
    }
}

// ── saved outputs ───────────────────────────────────────────────────

/// Reduce a call id to characters safe in a file name.
pub fn sanitize_call_id(call_id: &str) -> String {
    call_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write `value` pretty-printed to `{dir}/call_{id}_output.json`,
/// creating `dir` when needed. Returns the written path.
pub fn save_call_output(dir: &Path, call_id: &str, value: &Value) -> ar_domain::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("call_{}_output.json", sanitize_call_id(call_id)));
    let body = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, body)?;
    TraceEvent::WebhookOutputSaved {
        call_id: call_id.to_owned(),
        path: path.display().to_string(),
    }
    .emit();
    Ok(path)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_replaces_path_characters() {
        assert_eq!(sanitize_call_id("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_call_id("call-42_a"), "call-42_a");
    }

    #[test]
    fn save_writes_pretty_json_under_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested/outputs");
        let path = save_call_output(&out_dir, "c/1", &json!({"role": "QA"})).unwrap();

        assert_eq!(path, out_dir.join("call_c_1_output.json"));
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"role\": \"QA\""));
    }
}
