//! Data model shared by the upstream client, the transcript logic and the
//! gateway. Field names follow the Bey API wire format.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Agent
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Body of `POST /agent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub system_prompt: String,
    pub greeting: String,
    pub avatar_id: String,
}

/// An agent as returned by the upstream service. Only `id` and `name`
/// are relied upon; the remaining fields are echoed when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_id: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Call
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One conversation session between a user and an agent.
///
/// `ended_at` is `None` while the call is still in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub agent_id: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
}

impl Call {
    /// Whether the upstream reported an end timestamp for this call.
    pub fn has_ended(&self) -> bool {
        self.ended_at.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// The end timestamp parsed as UTC. `None` when the call is in
    /// progress or the timestamp is not understood.
    pub fn ended_at_utc(&self) -> Option<DateTime<Utc>> {
        self.ended_at.as_deref().and_then(parse_timestamp)
    }
}

/// Envelope of `GET /calls`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallList {
    #[serde(default)]
    pub data: Vec<Call>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One turn of a call transcript. Missing or `null` text fields
/// deserialize to empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sender: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
}

impl Message {
    pub fn new(sender: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            message: message.into(),
            sent_at: None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse an RFC 3339 timestamp, falling back to a bare `YYYY-MM-DD` date
/// (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn null_as_empty<'de, D>(de: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

/// Upstream ids are strings, but numeric ids are tolerated.
fn id_string<'de, D>(de: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_null_fields_become_empty() {
        let msg: Message =
            serde_json::from_str(r#"{"sender": null, "message": null}"#).unwrap();
        assert_eq!(msg.sender, "");
        assert_eq!(msg.message, "");
        assert!(msg.sent_at.is_none());
    }

    #[test]
    fn message_missing_fields_become_empty() {
        let msg: Message = serde_json::from_str("{}").unwrap();
        assert_eq!(msg, Message::default());
    }

    #[test]
    fn call_list_parses_numeric_ids_and_null_end() {
        let raw = r#"{"data": [
            {"id": 1, "agent_id": "a", "ended_at": null},
            {"id": "c-2", "agent_id": "a", "started_at": "2024-01-01T10:00:00Z", "ended_at": "2024-01-01T10:30:00Z"}
        ]}"#;
        let list: CallList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.data[0].id, "1");
        assert!(!list.data[0].has_ended());
        assert!(list.data[1].has_ended());
        assert!(list.data[1].ended_at_utc().is_some());
    }

    #[test]
    fn call_list_missing_data_is_empty() {
        let list: CallList = serde_json::from_str("{}").unwrap();
        assert!(list.data.is_empty());
    }

    #[test]
    fn parse_timestamp_accepts_bare_dates() {
        let a = parse_timestamp("2024-01-01").unwrap();
        let b = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday-ish").is_none());
    }

    #[test]
    fn agent_ignores_unknown_fields() {
        let agent: Agent =
            serde_json::from_str(r#"{"id": "ag_1", "name": "Recruiter", "language": "en"}"#)
                .unwrap();
        assert_eq!(agent.id, "ag_1");
        assert_eq!(agent.name, "Recruiter");
    }
}
