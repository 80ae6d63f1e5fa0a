//! Agent creation endpoint: POST /api/create-agent

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use ar_domain::error::Error;
use ar_domain::trace::TraceEvent;

use super::{api_error, missing_key_message};
use crate::prompt::{agent_spec, build_prompt};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub role_description: Option<String>,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub avatar_id: Option<String>,
    #[serde(default)]
    pub memory: Option<Value>,
}

/// POST /api/create-agent
///
/// A body that is missing or not an object is treated as empty, so it
/// fails field validation with 400 rather than an extractor rejection.
pub async fn create_agent(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(bey) = state.bey.clone() else {
        return api_error(StatusCode::INTERNAL_SERVER_ERROR, missing_key_message(&state));
    };

    let req: CreateAgentRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "create-agent body not understood; treating as empty");
        CreateAgentRequest::default()
    });

    let (Some(role_name), Some(role_description), Some(candidate_name)) = (
        non_empty(req.role_name.as_deref()),
        non_empty(req.role_description.as_deref()),
        non_empty(req.candidate_name.as_deref()),
    ) else {
        return api_error(
            StatusCode::BAD_REQUEST,
            "roleName, roleDescription and candidateName are required",
        );
    };

    let system_prompt = build_prompt(
        state.template_text(),
        role_name,
        role_description,
        candidate_name,
        req.memory.as_ref(),
    );
    let avatar_id = non_empty(req.avatar_id.as_deref())
        .unwrap_or(state.config.bey.default_avatar_id.as_str())
        .to_owned();
    let spec = agent_spec(role_name, candidate_name, system_prompt, avatar_id);

    match bey.create_agent(&spec).await {
        Ok(agent) => {
            TraceEvent::AgentCreated {
                agent_id: agent.id.clone(),
                agent_name: agent.name.clone(),
                avatar_id: spec.avatar_id.clone(),
                prompt_chars: spec.system_prompt.chars().count(),
                template_used: state.template.is_some(),
            }
            .emit();
            Json(serde_json::json!({
                "agentId": agent.id,
                "agentName": agent.name,
            }))
            .into_response()
        }
        Err(Error::Upstream {
            status, message, ..
        }) => {
            tracing::warn!(status, message = %message, "agent creation rejected upstream");
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            api_error(status, message)
        }
        Err(e) => {
            tracing::error!(error = %e, "agent creation failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.trim().is_empty())
}
