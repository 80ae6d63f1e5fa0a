//! `avatar-gateway create-agent`

use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use ar_domain::trace::TraceEvent;

use crate::prompt::{agent_spec, build_prompt};
use crate::state::AppState;

pub struct CreateAgentArgs {
    pub role_name: String,
    pub role_description: String,
    pub candidate_name: String,
    pub avatar_id: Option<String>,
    pub memory: Option<String>,
    pub memory_file: Option<std::path::PathBuf>,
}

pub async fn run(state: &AppState, args: CreateAgentArgs) -> anyhow::Result<()> {
    let bey = state
        .bey
        .as_ref()
        .with_context(|| format!("please set {} (in the environment or .env)", state.config.bey.api_key_env))?;

    let memory = resolve_memory(args.memory.as_deref(), args.memory_file.as_deref())?;
    let system_prompt = build_prompt(
        state.template_text(),
        &args.role_name,
        &args.role_description,
        &args.candidate_name,
        memory.as_ref(),
    );
    let avatar_id = args
        .avatar_id
        .unwrap_or_else(|| state.config.bey.default_avatar_id.clone());
    let spec = agent_spec(&args.role_name, &args.candidate_name, system_prompt, avatar_id);

    let agent = bey
        .create_agent(&spec)
        .await
        .context("creating agent")?;
    TraceEvent::AgentCreated {
        agent_id: agent.id.clone(),
        agent_name: agent.name.clone(),
        avatar_id: spec.avatar_id.clone(),
        prompt_chars: spec.system_prompt.chars().count(),
        template_used: state.template.is_some(),
    }
    .emit();

    println!("Created agent: {}", agent.name);
    println!("Agent ID: {}", agent.id);
    println!("Agent call link: {}", state.config.bey.embed_url(&agent.id));
    Ok(())
}

/// Memory from `--memory-file` (preferred) or `--memory`. Text that is not
/// valid JSON is kept as a JSON string.
pub fn resolve_memory(inline: Option<&str>, file: Option<&Path>) -> anyhow::Result<Option<Value>> {
    let raw = match (file, inline) {
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("reading memory file {}", path.display()))?,
        (None, Some(text)) => text.to_owned(),
        (None, None) => return Ok(None),
    };
    Ok(Some(
        serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_file_wins_over_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "[ {\"note\" : \"from file\"} ]\n").unwrap();

        let m = resolve_memory(Some("[1]"), Some(&path)).unwrap();
        assert_eq!(m, Some(json!([{"note": "from file"}])));
    }

    #[test]
    fn invalid_json_is_kept_as_text() {
        let m = resolve_memory(Some("asked about java"), None).unwrap();
        assert_eq!(m, Some(json!("asked about java")));
    }

    #[test]
    fn no_memory_is_none() {
        assert!(resolve_memory(None, None).unwrap().is_none());
    }

    #[test]
    fn unreadable_memory_file_is_an_error() {
        let err = resolve_memory(None, Some(Path::new("/nonexistent/memory.json"))).unwrap_err();
        assert!(err.to_string().contains("reading memory file"));
    }
}
