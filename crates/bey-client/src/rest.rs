//! REST implementation of [`BeyApi`].
//!
//! `RestBeyClient` wraps a `reqwest::Client` with an explicit per-request
//! timeout and translates every trait method into the corresponding call
//! against the Bey API. Failures are returned immediately, never retried.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use ar_domain::config::BeyConfig;
use ar_domain::error::{Error, Result};
use ar_domain::trace::TraceEvent;
use ar_domain::types::{Agent, AgentSpec, Call, CallList, Message};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::provider::BeyApi;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the Bey API.
///
/// Created once at startup and shared by every request handler. The
/// underlying `reqwest::Client` maintains a connection pool.
#[derive(Clone)]
pub struct RestBeyClient {
    http: Client,
    base_url: String,
    base: Url,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for RestBeyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBeyClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl RestBeyClient {
    /// Build a client from the `[bey]` config section and a resolved key.
    pub fn new(cfg: &BeyConfig, api_key: impl Into<String>) -> Result<Self> {
        let base_url = cfg.base_url.trim_end_matches('/').to_owned();
        let base = Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("bey.base_url '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "bey.base_url '{base_url}' cannot carry a path"
            )));
        }

        let timeout = Duration::from_millis(cfg.timeout_ms);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            base,
            api_key: api_key.into(),
            timeout,
        })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── request helpers ──────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/calls/{call_id}/messages` with the id percent-encoded as a
    /// single path segment.
    fn messages_url(&self, call_id: &str) -> Result<Url> {
        if call_id.is_empty() || call_id == "." || call_id == ".." {
            return Err(Error::Validation(format!("unusable call id '{call_id}'")));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::Config(format!("bey.base_url '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(["calls", call_id, "messages"]);
        Ok(url)
    }

    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("x-api-key", &self.api_key)
            .header("X-Trace-Id", Uuid::new_v4().to_string())
    }

    /// Send once, emit a `BeyCall` trace event, and turn non-2xx
    /// responses into `Error::Upstream`.
    async fn send(&self, endpoint: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                TraceEvent::BeyCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status();
        TraceEvent::BeyCall {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            duration_ms,
        }
        .emit();

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(endpoint, status = status.as_u16(), "Bey API request failed");
        Err(Error::Upstream {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            message: upstream_message(&body),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(endpoint: &str, resp: Response) -> Result<T> {
        let body = resp.text().await.map_err(from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            Error::Other(format!("failed to parse {endpoint} response: {e}: {body}"))
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl BeyApi for RestBeyClient {
    async fn create_agent(&self, spec: &AgentSpec) -> Result<Agent> {
        let endpoint = "POST /agent";
        let resp = self
            .send(endpoint, self.http.post(self.url("/agent")).json(spec))
            .await?;
        Self::decode(endpoint, resp).await
    }

    async fn list_calls(&self) -> Result<Vec<Call>> {
        let endpoint = "GET /calls";
        let resp = self.send(endpoint, self.http.get(self.url("/calls"))).await?;
        let list: CallList = Self::decode(endpoint, resp).await?;
        Ok(list.data)
    }

    async fn list_messages(&self, call_id: &str) -> Result<Vec<Message>> {
        let endpoint = "GET /calls/{id}/messages";
        let url = self.messages_url(call_id)?;
        let resp = self.send(endpoint, self.http.get(url)).await?;
        Self::decode(endpoint, resp).await
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// Human-readable message from an upstream error body: the first of
/// `error`, `message` or `detail` when the body is a JSON object, else
/// the raw text.
pub fn upstream_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_owned();
    };
    ["error", "message", "detail"]
        .iter()
        .filter_map(|k| value.get(k))
        .find(|v| !v.is_null() && v.as_str() != Some(""))
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_else(|| value.to_string())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_prefers_error_field() {
        let body = r#"{"error": "bad avatar", "message": "ignored"}"#;
        assert_eq!(upstream_message(body), "bad avatar");
    }

    #[test]
    fn upstream_message_falls_back_through_fields() {
        assert_eq!(upstream_message(r#"{"message": "quota"}"#), "quota");
        assert_eq!(upstream_message(r#"{"detail": "Not authenticated"}"#), "Not authenticated");
        assert_eq!(
            upstream_message(r#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#),
            r#"[{"loc":["body"],"msg":"field required"}]"#
        );
    }

    #[test]
    fn upstream_message_serializes_unrecognised_json() {
        assert_eq!(upstream_message(r#"{"code": 7}"#), r#"{"code":7}"#);
    }

    #[test]
    fn upstream_message_returns_plain_text() {
        assert_eq!(upstream_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn new_trims_trailing_slash() {
        let cfg = BeyConfig {
            base_url: "http://localhost:9/v1/".into(),
            ..BeyConfig::default()
        };
        let client = RestBeyClient::new(&cfg, "k").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9/v1");
        assert_eq!(client.timeout(), Duration::from_millis(cfg.timeout_ms));
    }

    #[test]
    fn call_id_stays_one_path_segment() {
        let client = RestBeyClient::new(&BeyConfig::default(), "k").unwrap();
        let url = client.messages_url("../../admin?x=1#").unwrap();
        assert_eq!(url.host_str(), Some("api.bey.dev"));
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
        let segments: Vec<_> = url.path_segments().unwrap().collect();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[..2], ["v1", "calls"]);
        assert_eq!(segments[3], "messages");
    }

    #[test]
    fn dot_and_empty_call_ids_are_rejected() {
        let client = RestBeyClient::new(&BeyConfig::default(), "k").unwrap();
        for id in ["", ".", ".."] {
            assert!(matches!(client.messages_url(id), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn unparseable_base_url_is_a_config_error() {
        let cfg = BeyConfig {
            base_url: "not a url".into(),
            ..BeyConfig::default()
        };
        assert!(matches!(RestBeyClient::new(&cfg, "k"), Err(Error::Config(_))));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let client = RestBeyClient::new(&BeyConfig::default(), "super-secret").unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
