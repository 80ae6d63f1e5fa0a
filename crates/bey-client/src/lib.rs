//! `ar-bey`: Beyond Presence API client.
//!
//! Provides the [`BeyApi`] trait the gateway talks to and a production
//! REST implementation ([`RestBeyClient`]).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use ar_domain::config::BeyConfig;
//! use ar_bey::{BeyApi, RestBeyClient};
//!
//! # async fn example() -> ar_domain::error::Result<()> {
//! let cfg = BeyConfig::default();
//! let client = RestBeyClient::new(&cfg, "my-api-key")?;
//!
//! let calls = client.list_calls().await?;
//! println!("{} calls visible", calls.len());
//! # Ok(())
//! # }
//! ```

pub mod provider;
pub mod rest;

pub use provider::BeyApi;
pub use rest::{from_reqwest, upstream_message, RestBeyClient};

use std::sync::Arc;

use ar_domain::config::BeyConfig;
use ar_domain::error::Result;

/// Build the shared client when an API key is configured.
///
/// Returns `Ok(None)` when `bey.api_key_env` is unset so callers can
/// still start and report the missing key per request.
pub fn create_client(cfg: &BeyConfig) -> Result<Option<Arc<dyn BeyApi>>> {
    match cfg.resolve_api_key() {
        Some(key) => {
            let client = RestBeyClient::new(cfg, key)?;
            tracing::info!(
                base_url = %client.base_url(),
                timeout_ms = cfg.timeout_ms,
                "Bey client ready"
            );
            Ok(Some(Arc::new(client)))
        }
        None => {
            tracing::warn!(
                env = %cfg.api_key_env,
                "Bey API key not set; upstream calls are disabled"
            );
            Ok(None)
        }
    }
}
