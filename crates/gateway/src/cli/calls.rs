//! `avatar-gateway fetch-calls` and `avatar-gateway fetch-output`

use anyhow::Context;

use ar_bey::BeyApi;
use ar_domain::types::{Call, Message};

use crate::output::{fetch_latest_output, FetchOutputError};
use crate::state::AppState;

fn client(state: &AppState) -> anyhow::Result<&dyn BeyApi> {
    state
        .bey
        .as_deref()
        .with_context(|| format!("please set {} (in the environment or .env)", state.config.bey.api_key_env))
}

/// Print every call of `agent_id` followed by its messages. A call whose
/// messages cannot be fetched is reported and skipped.
pub async fn fetch_calls(state: &AppState, agent_id: &str) -> anyhow::Result<()> {
    let bey = client(state)?;
    let calls = bey.list_calls().await.context("fetching calls")?;

    for call in calls.iter().filter(|c| c.agent_id == agent_id) {
        print!("{}", call_header(call));
        match bey.list_messages(&call.id).await {
            Ok(messages) => print!("{}", format_messages(&messages)),
            Err(e) => println!("Error fetching messages for call {}: {e}", call.id),
        }
    }
    Ok(())
}

/// Print the structured output of the agent's latest ended call.
pub async fn fetch_output(state: &AppState, agent_id: &str, json: bool) -> anyhow::Result<()> {
    let bey = client(state)?;
    match fetch_latest_output(bey, agent_id).await {
        Ok(found) => {
            let rendered = if json {
                serde_json::to_string_pretty(&serde_json::json!({
                    "callId": found.call_id,
                    "output": found.output,
                }))?
            } else {
                serde_json::to_string_pretty(&found.output)?
            };
            println!("{rendered}");
            Ok(())
        }
        Err(FetchOutputError::NoStructuredOutput { call_id, messages }) => {
            eprintln!("No structured JSON found in call {call_id}. Transcript:");
            eprint!("{}", format_messages(&messages));
            anyhow::bail!("no structured output for agent {agent_id}")
        }
        Err(e) => Err(e.into()),
    }
}

fn call_header(call: &Call) -> String {
    format!(
        "=== Call {} ===\nStarted at: {}\nEnded at: {}\n",
        call.id,
        call.started_at.as_deref().unwrap_or("None"),
        call.ended_at.as_deref().unwrap_or("None"),
    )
}

fn format_messages(messages: &[Message]) -> String {
    let mut out = String::from("Messages:\n");
    for m in messages {
        out.push_str(&format!(
            "[{}] {}:\n{}\n",
            m.sent_at.as_deref().unwrap_or("None"),
            m.sender,
            m.message
        ));
    }
    out
}
