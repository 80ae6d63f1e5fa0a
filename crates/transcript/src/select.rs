//! Choose which part of a call transcript carries the structured output.

use ar_domain::types::Message;
use serde_json::Value;

use crate::extract::extract;

/// Sender roles treated as the agent's own voice (compared lower-cased).
pub const ASSISTANT_ROLES: [&str; 3] = ["assistant", "ai", "bot"];

/// Separator placed between messages when the transcript is flattened.
pub const MESSAGE_SEPARATOR: &str = "\n\n";

/// A recovered payload and the message it came from.
///
/// `source` is `None` when the value was found in the flattened
/// transcript rather than a single assistant message.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub value: Value,
    pub source: Option<&'a Message>,
}

/// Whether a sender label belongs to the assistant side of the call.
pub fn is_assistant(sender: &str) -> bool {
    let sender = sender.to_lowercase();
    ASSISTANT_ROLES.contains(&sender.as_str())
}

/// Every message's text in order, joined by a blank line.
pub fn transcript_text(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| m.message.as_str())
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR)
}

/// Newest assistant message that yields JSON, else the flattened
/// transcript, else `None`.
pub fn select_output(messages: &[Message]) -> Option<Selection<'_>> {
    let from_assistant = messages
        .iter()
        .rev()
        .filter(|m| is_assistant(&m.sender))
        .find_map(|m| {
            extract(&m.message).map(|value| Selection {
                value,
                source: Some(m),
            })
        });
    if from_assistant.is_some() {
        return from_assistant;
    }

    extract(&transcript_text(messages)).map(|value| Selection {
        value,
        source: None,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assistant_roles_are_case_insensitive() {
        assert!(is_assistant("assistant"));
        assert!(is_assistant("Assistant"));
        assert!(is_assistant("AI"));
        assert!(is_assistant("Bot"));
        assert!(!is_assistant("user"));
        assert!(!is_assistant(""));
        assert!(!is_assistant(" assistant"));
    }

    #[test]
    fn newest_assistant_message_wins() {
        let messages = vec![
            Message::new("assistant", r#"{"role":"old"}"#),
            Message::new("user", "ok"),
            Message::new("Assistant", r#"Here: {"role":"new"}"#),
            Message::new("user", "thanks, bye"),
        ];
        let sel = select_output(&messages).unwrap();
        assert_eq!(sel.value, json!({"role": "new"}));
        assert_eq!(sel.source, Some(&messages[2]));
    }

    #[test]
    fn assistant_without_json_is_skipped() {
        let messages = vec![
            Message::new("bot", r#"OUTPUT_JSON_START {"role":"found"} OUTPUT_JSON_END"#),
            Message::new("bot", "Goodbye!"),
        ];
        let sel = select_output(&messages).unwrap();
        assert_eq!(sel.value, json!({"role": "found"}));
        assert_eq!(sel.source, Some(&messages[0]));
    }

    #[test]
    fn user_json_found_through_flattened_transcript() {
        let messages = vec![
            Message::new("ai", "What role are you hiring for?"),
            Message::new("user", r#"Here is my brief {"role":"SRE","seniority":"staff"}"#),
        ];
        let sel = select_output(&messages).unwrap();
        assert_eq!(sel.value, json!({"role": "SRE", "seniority": "staff"}));
        assert!(sel.source.is_none());
    }

    #[test]
    fn empty_transcript_yields_none() {
        assert!(select_output(&[]).is_none());
    }

    #[test]
    fn transcript_text_joins_with_blank_line() {
        let messages = vec![Message::new("a", "one"), Message::new("b", "two")];
        assert_eq!(transcript_text(&messages), "one\n\ntwo");
    }
}
