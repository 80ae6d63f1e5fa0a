use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// System prompt template
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Candidate locations for the template, tried in order. The first
    /// readable file wins.
    #[serde(default = "d_template_paths")]
    pub template_paths: Vec<PathBuf>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template_paths: d_template_paths(),
        }
    }
}

fn d_template_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("agent/system_prompt.txt"),
        PathBuf::from("../agent/system_prompt.txt"),
    ]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Webhook outputs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputsConfig {
    /// Directory receiving `call_{id}_output.json` files from the webhook.
    #[serde(default = "d_outputs_dir")]
    pub dir: PathBuf,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            dir: d_outputs_dir(),
        }
    }
}

fn d_outputs_dir() -> PathBuf {
    PathBuf::from("agent/call_outputs")
}
