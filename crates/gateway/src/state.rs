use std::sync::Arc;

use ar_bey::BeyApi;
use ar_domain::config::Config;

use crate::prompt::PromptTemplate;

/// Shared application state passed to all API handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no API key is configured; handlers that need the
    /// upstream answer 500 in that case.
    pub bey: Option<Arc<dyn BeyApi>>,
    /// `None` when no template candidate could be read; agents then get
    /// the fallback prompt.
    pub template: Option<Arc<PromptTemplate>>,
    /// SHA-256 digest of the webhook bearer token. `None` leaves
    /// `/webhook` open.
    pub webhook_token_hash: Option<Vec<u8>>,
}

impl AppState {
    pub fn template_text(&self) -> Option<&str> {
        self.template.as_deref().map(|t| t.text.as_str())
    }
}
