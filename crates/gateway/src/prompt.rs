//! Agent provisioning: system-prompt templating and the upstream create
//! body.

use std::path::PathBuf;

use ar_domain::types::AgentSpec;
use serde_json::Value;

const MEMORY_TOKEN: &str = "{memory}";
const ROLE_NAME_TOKEN: &str = "{role_name}";
const ROLE_DESCRIPTION_TOKEN: &str = "{role_description}";
const CANDIDATE_NAME_TOKEN: &str = "{candidate_name}";

/// A system-prompt template read from disk at startup.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub path: PathBuf,
    pub text: String,
}

impl PromptTemplate {
    /// Read the first candidate path that loads. `None` when none do; the
    /// caller then falls back to [`fallback_prompt`].
    pub fn load(candidates: &[PathBuf]) -> Option<Self> {
        for path in candidates {
            match std::fs::read_to_string(path) {
                Ok(text) => {
                    tracing::info!(path = %path.display(), chars = text.len(), "prompt template loaded");
                    return Some(Self {
                        path: path.clone(),
                        text,
                    });
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "prompt template candidate unreadable");
                }
            }
        }
        tracing::warn!(
            candidates = ?candidates.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "no prompt template found; agents will use the fallback prompt"
        );
        None
    }
}

/// Prompt used when no template could be loaded.
pub fn fallback_prompt(role_name: &str, candidate_name: &str) -> String {
    format!("Ava: {role_name} Recruiter for {candidate_name}")
}

/// JSON text substituted for the memory placeholder. Absent or empty
/// memory renders as `[]`.
pub fn render_memory(memory: Option<&Value>) -> String {
    let empty = match memory {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
        Some(_) => false,
    };
    match memory {
        Some(v) if !empty => serde_json::to_string(v).unwrap_or_else(|_| "[]".into()),
        _ => "[]".into(),
    }
}

/// Render the system prompt.
///
/// The first occurrence of each placeholder in the template is replaced
/// in a single pass, so substituted values are never rescanned. Doubled
/// braces in the template text then collapse to single ones; substituted
/// values are left as they are, so memory JSON containing `}}` reaches
/// the agent intact instead of being collapsed along with the template.
/// Without a template the fallback prompt is returned.
pub fn build_prompt(
    template: Option<&str>,
    role_name: &str,
    role_description: &str,
    candidate_name: &str,
    memory: Option<&Value>,
) -> String {
    let Some(template) = template else {
        return fallback_prompt(role_name, candidate_name);
    };

    let memory = render_memory(memory);
    let mut slots: Vec<(usize, &str, &str)> = [
        (MEMORY_TOKEN, memory.as_str()),
        (ROLE_NAME_TOKEN, role_name),
        (ROLE_DESCRIPTION_TOKEN, role_description),
        (CANDIDATE_NAME_TOKEN, candidate_name),
    ]
    .into_iter()
    .filter_map(|(token, value)| template.find(token).map(|at| (at, token, value)))
    .collect();
    slots.sort_by_key(|(at, _, _)| *at);

    let mut out = String::with_capacity(template.len() + memory.len());
    let mut cursor = 0;
    for (at, token, value) in slots {
        out.push_str(&collapse_braces(&template[cursor..at]));
        out.push_str(value);
        cursor = at + token.len();
    }
    out.push_str(&collapse_braces(&template[cursor..]));
    out
}

fn collapse_braces(text: &str) -> String {
    text.replace("{{", "{").replace("}}", "}")
}

/// Upstream create body for a recruiter agent.
pub fn agent_spec(
    role_name: &str,
    candidate_name: &str,
    system_prompt: String,
    avatar_id: String,
) -> AgentSpec {
    AgentSpec {
        name: format!("{role_name} Recruiter for {candidate_name}"),
        system_prompt,
        greeting: format!(
            "Hello {candidate_name}, how are you doing? Are you ready to discuss the candidate requirements?"
        ),
        avatar_id,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
