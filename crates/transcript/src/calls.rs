//! Pick the call whose transcript should be inspected.

use ar_domain::types::Call;

/// The most recently ended call belonging to `agent_id`.
///
/// Calls still in progress are ignored. Ties on the end timestamp go to
/// the call listed first. An end timestamp that cannot be parsed still
/// counts as ended but ranks below every parseable one.
pub fn latest_ended_call<'a>(agent_id: &str, calls: &'a [Call]) -> Option<&'a Call> {
    let mut best: Option<&Call> = None;
    for call in calls.iter().filter(|c| is_ended_for(c, agent_id)) {
        match best {
            Some(current) if call.ended_at_utc() <= current.ended_at_utc() => {}
            _ => best = Some(call),
        }
    }
    best
}

/// Calls for `agent_id` that have an end timestamp, in listing order.
pub fn ended_calls<'a>(agent_id: &str, calls: &'a [Call]) -> Vec<&'a Call> {
    calls.iter().filter(|c| is_ended_for(c, agent_id)).collect()
}

fn is_ended_for(call: &Call, agent_id: &str) -> bool {
    call.agent_id == agent_id && call.has_ended()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str, agent: &str, ended_at: Option<&str>) -> Call {
        Call {
            id: id.into(),
            agent_id: agent.into(),
            started_at: None,
            ended_at: ended_at.map(String::from),
        }
    }

    #[test]
    fn picks_latest_end_timestamp() {
        let calls = vec![
            call("1", "agent", None),
            call("2", "agent", Some("2024-01-01")),
            call("3", "agent", Some("2024-02-01")),
        ];
        assert_eq!(latest_ended_call("agent", &calls).unwrap().id, "3");
    }

    #[test]
    fn listing_order_does_not_matter() {
        let calls = vec![
            call("3", "agent", Some("2024-02-01T09:00:00Z")),
            call("2", "agent", Some("2024-01-01T09:00:00Z")),
        ];
        assert_eq!(latest_ended_call("agent", &calls).unwrap().id, "3");
    }

    #[test]
    fn other_agents_are_ignored() {
        let calls = vec![
            call("1", "agent", Some("2024-01-01")),
            call("2", "other", Some("2025-01-01")),
        ];
        assert_eq!(latest_ended_call("agent", &calls).unwrap().id, "1");
    }

    #[test]
    fn in_progress_only_yields_none() {
        let calls = vec![call("1", "agent", None), call("2", "agent", Some(""))];
        assert!(latest_ended_call("agent", &calls).is_none());
        assert!(latest_ended_call("agent", &[]).is_none());
    }

    #[test]
    fn ended_calls_keeps_listing_order() {
        let calls = vec![
            call("1", "agent", Some("2024-02-01")),
            call("2", "agent", None),
            call("3", "agent", Some("2024-01-01")),
        ];
        let ids: Vec<&str> = ended_calls("agent", &calls)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn ties_go_to_first_listed() {
        let calls = vec![
            call("a", "agent", Some("2024-03-01T12:00:00Z")),
            call("b", "agent", Some("2024-03-01T12:00:00+00:00")),
        ];
        assert_eq!(latest_ended_call("agent", &calls).unwrap().id, "a");
    }

    #[test]
    fn unparseable_timestamp_ranks_lowest() {
        let calls = vec![
            call("weird", "agent", Some("sometime")),
            call("real", "agent", Some("2023-05-05")),
        ];
        assert_eq!(latest_ended_call("agent", &calls).unwrap().id, "real");

        let only_weird = vec![call("weird", "agent", Some("sometime"))];
        assert_eq!(latest_ended_call("agent", &only_weird).unwrap().id, "weird");
    }

    #[test]
    fn timezone_offsets_are_normalised() {
        let calls = vec![
            call("utc", "agent", Some("2024-03-01T12:00:00Z")),
            // 11:30 UTC, earlier despite the larger wall-clock hour
            call("cet", "agent", Some("2024-03-01T12:30:00+01:00")),
        ];
        assert_eq!(latest_ended_call("agent", &calls).unwrap().id, "utc");
    }
}
