mod bey;
mod observability;
mod prompt;
mod server;

pub use bey::*;
pub use observability::*;
pub use prompt::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub bey: BeyConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl ConfigError {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError::error(
                "server.port",
                "port must be greater than 0",
            ));
        }

        if self.server.host.is_empty() {
            errors.push(ConfigError::error("server.host", "host must not be empty"));
        }

        if self.server.max_concurrent_requests == 0 {
            errors.push(ConfigError::error(
                "server.max_concurrent_requests",
                "must allow at least one request",
            ));
        }

        if self.bey.base_url.is_empty() {
            errors.push(ConfigError::error(
                "bey.base_url",
                "base_url must not be empty",
            ));
        } else if !self.bey.base_url.starts_with("http://")
            && !self.bey.base_url.starts_with("https://")
        {
            errors.push(ConfigError::error(
                "bey.base_url",
                format!("'{}' is not an http(s) URL", self.bey.base_url),
            ));
        }

        if self.bey.timeout_ms == 0 {
            errors.push(ConfigError::error(
                "bey.timeout_ms",
                "timeout must be greater than 0",
            ));
        }

        if self.bey.default_avatar_id.trim().is_empty() {
            errors.push(ConfigError::error(
                "bey.default_avatar_id",
                "default avatar id must not be empty",
            ));
        }

        // Handlers fail with 500 at request time; only warn here so the
        // UI can still be served.
        if self.bey.resolve_api_key().is_none() {
            errors.push(ConfigError::warning(
                "bey.api_key_env",
                format!(
                    "environment variable {} is not set; agent creation and output fetching will fail",
                    self.bey.api_key_env
                ),
            ));
        }

        if self.prompt.template_paths.is_empty() {
            errors.push(ConfigError::warning(
                "prompt.template_paths",
                "no template paths configured; the fallback prompt will always be used",
            ));
        }

        if !(0.0..=1.0).contains(&self.observability.sample_rate) {
            errors.push(ConfigError::error(
                "observability.sample_rate",
                "sample_rate must be between 0.0 and 1.0",
            ));
        }

        errors
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_only(cfg: &Config) -> Vec<ConfigError> {
        cfg.validate()
            .into_iter()
            .filter(|e| e.severity == ConfigSeverity::Error)
            .collect()
    }

    #[test]
    fn default_config_has_no_errors() {
        assert!(errors_only(&Config::default()).is_empty());
    }

    #[test]
    fn zero_port_is_an_error() {
        let mut cfg = Config::default();
        cfg.server.port = 0;
        let errs = errors_only(&cfg);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "server.port");
    }

    #[test]
    fn non_http_base_url_is_an_error() {
        let mut cfg = Config::default();
        cfg.bey.base_url = "api.bey.dev/v1".into();
        let errs = errors_only(&cfg);
        assert!(errs.iter().any(|e| e.field == "bey.base_url"));
    }

    #[test]
    fn missing_api_key_is_only_a_warning() {
        let mut cfg = Config::default();
        cfg.bey.api_key_env = "AR_TEST_KEY_THAT_IS_NEVER_SET".into();
        let issues = cfg.validate();
        let issue = issues
            .iter()
            .find(|e| e.field == "bey.api_key_env")
            .expect("api key warning");
        assert_eq!(issue.severity, ConfigSeverity::Warning);
    }

    #[test]
    fn display_includes_severity_tag() {
        let e = ConfigError::error("server.host", "host must not be empty");
        assert_eq!(e.to_string(), "[ERROR] server.host: host must not be empty");
    }
}
