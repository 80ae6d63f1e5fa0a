//! Shared startup path for `serve` and the one-shot CLI commands.

use std::sync::Arc;

use anyhow::Context;
use sha2::{Digest, Sha256};

use ar_domain::config::{Config, ConfigSeverity};

use crate::prompt::PromptTemplate;
use crate::state::AppState;

/// Validate config, load the prompt template, build the upstream client
/// and return a fully-wired [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── Prompt template ──────────────────────────────────────────────
    let template = PromptTemplate::load(&config.prompt.template_paths).map(Arc::new);

    // ── Bey client ───────────────────────────────────────────────────
    let bey = ar_bey::create_client(&config.bey).context("creating Bey client")?;

    // ── Webhook token ────────────────────────────────────────────────
    let webhook_token_hash = hash_token_env(&config.server.webhook_token_env);
    if webhook_token_hash.is_none() {
        tracing::warn!(
            env = %config.server.webhook_token_env,
            "webhook token not set; /webhook accepts unauthenticated requests"
        );
    }

    Ok(AppState {
        config,
        bey,
        template,
        webhook_token_hash,
    })
}

/// SHA-256 of the token held in `env`, or `None` when the variable is
/// unset or blank.
pub fn hash_token_env(env: &str) -> Option<Vec<u8>> {
    std::env::var(env)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .map(|t| Sha256::digest(t.as_bytes()).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_fails_to_boot() {
        let mut cfg = Config::default();
        cfg.server.port = 0;
        let err = build_app_state(Arc::new(cfg)).err().expect("boot error");
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn missing_key_and_template_still_boot() {
        let mut cfg = Config::default();
        cfg.bey.api_key_env = "AR_BOOTSTRAP_TEST_KEY_UNSET".into();
        cfg.server.webhook_token_env = "AR_BOOTSTRAP_TEST_TOKEN_UNSET".into();
        cfg.prompt.template_paths = vec!["/nonexistent/system_prompt.txt".into()];
        let state = build_app_state(Arc::new(cfg)).unwrap();
        assert!(state.bey.is_none());
        assert!(state.template.is_none());
        assert!(state.webhook_token_hash.is_none());
    }

    #[test]
    fn unset_token_env_has_no_hash() {
        assert!(hash_token_env("AR_BOOTSTRAP_TEST_TOKEN_NEVER_SET").is_none());
    }
}
