//! The `BeyApi` trait defines the upstream surface the gateway relies on
//! (REST client in production, in-memory fakes in tests).

use async_trait::async_trait;
use ar_domain::error::Result;
use ar_domain::types::{Agent, AgentSpec, Call, Message};

/// Abstraction over the Beyond Presence API.
///
/// Non-success responses surface as `Error::Upstream`; nothing is
/// retried.
#[async_trait]
pub trait BeyApi: Send + Sync {
    /// Create a hosted agent (POST /agent).
    async fn create_agent(&self, spec: &AgentSpec) -> Result<Agent>;

    /// List calls visible to the API key (GET /calls).
    async fn list_calls(&self) -> Result<Vec<Call>>;

    /// Transcript of one call, in chronological order
    /// (GET /calls/{id}/messages).
    async fn list_messages(&self, call_id: &str) -> Result<Vec<Message>>;
}
