//! Best-effort recovery of a JSON payload embedded in conversational text.
//!
//! Strategies run in a fixed order and the first candidate that parses
//! wins:
//!
//! 1. `OUTPUT_JSON_START { ... } OUTPUT_JSON_END` markers
//! 2. a ```` ```json ```` fenced block
//! 3. the first object opening with a `"role"` key
//! 4. a depth-counting scan for balanced `{}` spans, then `[]` spans
//!
//! Strategies 1–3 look at their first regex match only. Every candidate
//! gets three parse attempts: verbatim, with backticks and surrounding
//! whitespace stripped, and with one trailing comma removed before the
//! final closing delimiter.
//!
//! Input that is itself a complete JSON object or array is returned
//! directly, before any strategy runs.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)OUTPUT_JSON_START\s*(\{.*?\})\s*OUTPUT_JSON_END").expect("marker regex")
});

static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").expect("fenced regex"));

static ROLE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)(\{\s*"role".*?\})"#).expect("role-key regex"));

static TRAILING_COMMA_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\}\s*$").expect("trailing comma regex"));

static TRAILING_COMMA_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\]\s*$").expect("trailing comma regex"));

/// Which strategy produced an extracted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    WholeInput,
    Marker,
    Fenced,
    RoleKey,
    Balanced,
}

type Matcher = fn(&str) -> Option<Value>;

/// Pattern strategies, most specific first.
const PATTERN_STRATEGIES: [(Strategy, Matcher); 3] = [
    (Strategy::Marker, marker),
    (Strategy::Fenced, fenced),
    (Strategy::RoleKey, role_key),
];

/// Extract the first JSON value embedded in `text`.
///
/// Returns `None` when nothing parseable is found; empty input is not an
/// error.
pub fn extract(text: &str) -> Option<Value> {
    extract_with_strategy(text).map(|(value, _)| value)
}

/// [`extract`] for optional input (`None` behaves like empty text).
pub fn extract_opt(text: Option<&str>) -> Option<Value> {
    text.and_then(extract)
}

/// [`extract`], also reporting which strategy matched.
pub fn extract_with_strategy(text: &str) -> Option<(Value, Strategy)> {
    if text.trim().is_empty() {
        return None;
    }

    if let Some(value) = whole_input(text) {
        return Some((value, Strategy::WholeInput));
    }

    for (strategy, matcher) in PATTERN_STRATEGIES {
        if let Some(value) = matcher(text) {
            tracing::trace!(?strategy, "json extracted");
            return Some((value, strategy));
        }
    }

    balanced_scan(text).map(|value| (value, Strategy::Balanced))
}

// ── strategies ───────────────────────────────────────────────────────

fn whole_input(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    serde_json::from_str::<Value>(trimmed)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
}

fn marker(text: &str) -> Option<Value> {
    first_capture(&MARKER, text)
}

fn fenced(text: &str) -> Option<Value> {
    first_capture(&FENCED, text)
}

fn role_key(text: &str) -> Option<Value> {
    first_capture(&ROLE_KEY, text)
}

fn first_capture(re: &Regex, text: &str) -> Option<Value> {
    let caps = re.captures(text)?;
    let span = caps.get(1)?.as_str();
    parse_candidate(span)
}

/// Depth-counting scan over `{}` spans, then `[]` spans.
///
/// Delimiters inside string literals are counted like any other, so a
/// quoted brace can close a span early.
fn balanced_scan(text: &str) -> Option<Value> {
    [(b'{', b'}'), (b'[', b']')]
        .into_iter()
        .find_map(|(open, close)| scan_pair(text, open, close))
}

fn scan_pair(text: &str, open: u8, close: u8) -> Option<Value> {
    let bytes = text.as_bytes();
    for start in 0..bytes.len() {
        if bytes[start] != open {
            continue;
        }
        let Some(end) = matching_close(bytes, start, open, close) else {
            continue;
        };
        // Both ends are ASCII delimiters, so these are char boundaries.
        if let Some(value) = parse_candidate(&text[start..=end]) {
            return Some(value);
        }
    }
    None
}

/// Index of the delimiter that brings depth back to zero, if any.
fn matching_close(bytes: &[u8], start: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, &b) in bytes[start..].iter().enumerate() {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(start + offset);
            }
        }
    }
    None
}

// ── candidate parsing ────────────────────────────────────────────────

/// Try a candidate verbatim, then cleaned of backticks, then with a
/// trailing comma removed.
fn parse_candidate(candidate: &str) -> Option<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(candidate) {
        return Some(v);
    }

    let stripped = candidate.replace('`', "");
    let stripped = stripped.trim();
    if let Ok(v) = serde_json::from_str::<Value>(stripped) {
        return Some(v);
    }

    let cleaned = strip_trailing_comma(stripped);
    serde_json::from_str::<Value>(&cleaned).ok()
}

fn strip_trailing_comma(candidate: &str) -> String {
    let once = TRAILING_COMMA_OBJECT.replace(candidate, "}");
    TRAILING_COMMA_ARRAY.replace(&once, "]").into_owned()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
