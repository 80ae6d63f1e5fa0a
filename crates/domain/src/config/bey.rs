use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Bey (Beyond Presence) upstream API
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeyConfig {
    /// API root, including the version segment.
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Public chat host; the iframe URL is `{embed_base_url}/{agent_id}`.
    #[serde(default = "d_embed_base_url")]
    pub embed_base_url: String,
    /// Environment variable holding the `x-api-key` value.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Per-request timeout for every upstream call.
    #[serde(default = "d_15000")]
    pub timeout_ms: u64,
    /// Avatar used when a create request does not name one.
    #[serde(default = "d_default_avatar")]
    pub default_avatar_id: String,
    /// Avatars offered by the creation page.
    #[serde(default = "d_avatars")]
    pub avatars: Vec<AvatarChoice>,
}

impl Default for BeyConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            embed_base_url: d_embed_base_url(),
            api_key_env: d_api_key_env(),
            timeout_ms: d_15000(),
            default_avatar_id: d_default_avatar(),
            avatars: d_avatars(),
        }
    }
}

impl BeyConfig {
    /// Read the API key from `api_key_env`. Empty values count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    }

    /// Iframe URL for an agent session.
    pub fn embed_url(&self, agent_id: &str) -> String {
        format!("{}/{}", self.embed_base_url.trim_end_matches('/'), agent_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarChoice {
    pub label: String,
    pub id: String,
}

// ── serde default helpers ───────────────────────────────────────────

const MALE_AVATAR_ID: &str = "b9be11b8-89fb-4227-8f86-4a881393cbdb";
const FEMALE_AVATAR_ID: &str = "70b1b917-ed16-4531-bb6c-b0bdb79449b4";

fn d_base_url() -> String {
    "https://api.bey.dev/v1".into()
}
fn d_embed_base_url() -> String {
    "https://bey.chat".into()
}
fn d_api_key_env() -> String {
    "BEY_API_KEY".into()
}
fn d_15000() -> u64 {
    15_000
}
fn d_default_avatar() -> String {
    MALE_AVATAR_ID.into()
}
fn d_avatars() -> Vec<AvatarChoice> {
    vec![
        AvatarChoice {
            label: "Male".into(),
            id: MALE_AVATAR_ID.into(),
        },
        AvatarChoice {
            label: "Female".into(),
            id: FEMALE_AVATAR_ID.into(),
        },
    ]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_api() {
        let cfg = BeyConfig::default();
        assert_eq!(cfg.base_url, "https://api.bey.dev/v1");
        assert_eq!(cfg.api_key_env, "BEY_API_KEY");
        assert_eq!(cfg.default_avatar_id, MALE_AVATAR_ID);
        assert_eq!(cfg.avatars.len(), 2);
    }

    #[test]
    fn embed_url_tolerates_trailing_slash() {
        let cfg = BeyConfig {
            embed_base_url: "https://bey.chat/".into(),
            ..BeyConfig::default()
        };
        assert_eq!(cfg.embed_url("ag_42"), "https://bey.chat/ag_42");
    }

    #[test]
    fn avatars_can_be_replaced() {
        let toml_str = r#"
            timeout_ms = 500

            [[avatars]]
            label = "Robot"
            id = "r-1"
        "#;
        let cfg: BeyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.timeout_ms, 500);
        assert_eq!(
            cfg.avatars,
            vec![AvatarChoice {
                label: "Robot".into(),
                id: "r-1".into()
            }]
        );
    }
}
