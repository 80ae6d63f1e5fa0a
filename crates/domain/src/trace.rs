use serde::Serialize;

/// Structured trace events emitted across all avatar-recruiter crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    BeyCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    AgentCreated {
        agent_id: String,
        agent_name: String,
        avatar_id: String,
        prompt_chars: usize,
        template_used: bool,
    },
    CallResolved {
        agent_id: String,
        call_id: String,
        candidates: usize,
    },
    OutputExtracted {
        call_id: String,
        message_count: usize,
        from_assistant: bool,
    },
    OutputMissing {
        call_id: String,
        message_count: usize,
    },
    WebhookOutputSaved {
        call_id: String,
        path: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "ar_event");
    }
}
