pub mod agent;
pub mod calls;
pub mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// avatar-gateway: create Bey recruiter avatars and collect their
/// structured call output.
#[derive(Debug, Parser)]
#[command(name = "avatar-gateway", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP gateway (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Create a recruiter agent and print its call link.
    CreateAgent {
        /// Name of the role to interview for.
        #[arg(long)]
        role_name: String,
        /// Description of the role to interview for.
        #[arg(long)]
        role_description: String,
        /// Name of the candidate to interview.
        #[arg(long)]
        candidate_name: String,
        /// Avatar id (defaults to `bey.default_avatar_id`).
        #[arg(long)]
        avatar_id: Option<String>,
        /// Memory JSON injected into the system prompt,
        /// e.g. '[{"note":"previous call: asked about java"}]'.
        #[arg(long)]
        memory: Option<String>,
        /// File holding the memory JSON. Takes precedence over --memory.
        #[arg(long)]
        memory_file: Option<PathBuf>,
    },
    /// Print every call of an agent together with its transcript.
    FetchCalls {
        /// Agent id to fetch calls for.
        #[arg(long)]
        agent_id: String,
    },
    /// Print the structured output of an agent's latest ended call.
    FetchOutput {
        /// Agent id to fetch output for.
        #[arg(long)]
        agent_id: String,
        /// Print `{callId, output}` as JSON instead of the bare output.
        #[arg(long)]
        json: bool,
    },
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `AR_CONFIG` (or
/// `config.toml` by default).  Returns the parsed [`Config`] and the
/// path that was used. A missing file yields the defaults.
///
/// [`Config`]: ar_domain::config::Config
pub fn load_config() -> anyhow::Result<(ar_domain::config::Config, String)> {
    let config_path = std::env::var("AR_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let config = load_config_from(&config_path)?;
    Ok((config, config_path))
}

pub fn load_config_from(config_path: &str) -> anyhow::Result<ar_domain::config::Config> {
    if !std::path::Path::new(config_path).exists() {
        return Ok(ar_domain::config::Config::default());
    }
    let raw = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_config_from("/nonexistent/avatar-gateway.toml").unwrap();
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn file_overrides_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8088\n[bey]\ntimeout_ms = 500\n").unwrap();
        let cfg = load_config_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.bey.timeout_ms, 500);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nport = ").unwrap();
        let err = load_config_from(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("parsing "));
    }

    #[test]
    fn create_agent_args_parse() {
        let cli = Cli::try_parse_from([
            "avatar-gateway",
            "create-agent",
            "--role-name",
            "Recruiter",
            "--role-description",
            "Hiring",
            "--candidate-name",
            "Acme",
            "--memory",
            "[]",
        ])
        .unwrap();
        match cli.command {
            Some(Command::CreateAgent {
                role_name, memory, avatar_id, ..
            }) => {
                assert_eq!(role_name, "Recruiter");
                assert_eq!(memory.as_deref(), Some("[]"));
                assert!(avatar_id.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
