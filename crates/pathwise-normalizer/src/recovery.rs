//! Recover one JSON value from model text interleaved with prose and fences
//!
//! Looseness comes from *locating* the JSON, never from relaxing the grammar:
//! every candidate is parsed with `serde_json`, so trailing commas, comments
//! and single quotes still fail.

use crate::error::RecoveryFailure;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

static FENCE_OPENER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```[ \t]*json\b").unwrap());
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:\d+[.)]|[-*•])[ \t]+").unwrap());

const FENCE: &str = "```";
const BOM: char = '\u{feff}';

/// Strategy that produced a recovered value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategy {
    /// Interior of the first fenced block
    Fence,
    /// Shortest parseable prefix starting at the first bracket
    BracketScan,
    /// The whole cleaned text
    WholeText,
    /// Text wrapped in a synthetic `{"maybe": ...}` envelope
    WrappedArray,
}

/// A JSON array or object recovered from model text
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveredJson {
    /// The parsed value; always an array or an object
    pub value: Value,
    /// Strategy that found it
    pub strategy: RecoveryStrategy,
    /// Found only after list markers were stripped from every line
    pub loose: bool,
}

/// Locates and parses JSON in untrusted model text
#[derive(Debug, Clone, Copy)]
pub struct JsonRecovery {
    max_scan_bytes: usize,
}

impl Default for JsonRecovery {
    fn default() -> Self {
        Self::new(64 * 1024)
    }
}

/// Recover JSON using the default scan bound
pub fn recover_json(text: &str) -> Result<RecoveredJson, RecoveryFailure> {
    JsonRecovery::default().recover(text)
}

impl JsonRecovery {
    /// Create a recovery engine whose bracket scan stops after `max_scan_bytes`
    pub fn new(max_scan_bytes: usize) -> Self {
        Self { max_scan_bytes }
    }

    /// Recover exactly one JSON array or object from `text`
    ///
    /// Strategies run in a fixed order and the first success wins:
    /// fenced block, bracket scan, whole text, wrapped array, then one retry
    /// of the first three with list markers stripped from every line.
    pub fn recover(&self, text: &str) -> Result<RecoveredJson, RecoveryFailure> {
        let text = text.trim_start_matches(BOM);
        if text.trim().is_empty() {
            return Err(RecoveryFailure::EmptyInput);
        }

        if let Some((value, strategy)) = self.strict_pass(text) {
            return Ok(RecoveredJson {
                value,
                strategy,
                loose: false,
            });
        }

        let bare = without_fences(&normalize_fences(text));
        if let Some(value) = wrapped_array(&bare) {
            debug!("Recovered JSON via wrapped-array envelope");
            return Ok(RecoveredJson {
                value,
                strategy: RecoveryStrategy::WrappedArray,
                loose: false,
            });
        }

        let stripped = LIST_MARKER.replace_all(text, "");
        if stripped != text {
            if let Some((value, strategy)) = self.strict_pass(&stripped) {
                debug!("Recovered JSON after stripping list markers");
                return Ok(RecoveredJson {
                    value,
                    strategy,
                    loose: true,
                });
            }
        }

        debug!("No JSON recovered from {} bytes", text.len());
        Err(RecoveryFailure::NoJsonFound(text.len()))
    }

    /// Fence, object run, bracket scan and whole-text parse
    fn strict_pass(&self, text: &str) -> Option<(Value, RecoveryStrategy)> {
        let fenced = normalize_fences(text);

        if let Some(value) = first_fenced_block(&fenced).and_then(parse_container) {
            debug!("Recovered JSON from fenced block");
            return Some((value, RecoveryStrategy::Fence));
        }

        let bare = without_fences(&fenced);
        if let Some(value) = self.object_run(&bare) {
            debug!("Recovered JSON from a bare run of objects");
            return Some((value, RecoveryStrategy::WrappedArray));
        }

        if let Some(value) = self.bracket_scan(&bare) {
            debug!("Recovered JSON via bracket scan");
            return Some((value, RecoveryStrategy::BracketScan));
        }

        parse_container(&bare).map(|value| (value, RecoveryStrategy::WholeText))
    }

    /// Objects listed without an enclosing array, like `{...}, {...}`
    ///
    /// Runs before the bracket scan, which would stop at the first object.
    /// Only a span of two or more comma-separated objects counts.
    fn object_run(&self, text: &str) -> Option<Value> {
        let start = text.find(|c: char| c == '[' || c == '{')?;
        let end = text.rfind('}')?;
        if !text[start..].starts_with('{') || end <= start || end - start >= self.max_scan_bytes {
            return None;
        }

        match serde_json::from_str::<Value>(&format!("[{}]", &text[start..=end])) {
            Ok(Value::Array(items)) if items.len() > 1 && items.iter().all(Value::is_object) => {
                Some(Value::Array(items))
            }
            _ => None,
        }
    }

    /// Grow a candidate from the first `[` or `{` and parse after each growth
    ///
    /// Only prefixes ending in a closing bracket are parsed; a JSON container
    /// cannot end anywhere else, so the first hit is the same as parsing every
    /// prefix. Quoted brackets are not tracked, which is fine for the bounded
    /// responses this sees.
    fn bracket_scan(&self, text: &str) -> Option<Value> {
        let start = text.find(|c: char| c == '[' || c == '{')?;
        let candidate = &text[start..];

        for (offset, ch) in candidate.char_indices() {
            if offset >= self.max_scan_bytes {
                debug!("Bracket scan stopped at {} bytes", self.max_scan_bytes);
                break;
            }
            if ch != ']' && ch != '}' {
                continue;
            }
            if let Some(value) = parse_container(&candidate[..offset + ch.len_utf8()]) {
                return Some(value);
            }
        }
        None
    }
}

/// Rewrite every "```json" opener to a bare fence
fn normalize_fences(text: &str) -> String {
    FENCE_OPENER.replace_all(text, FENCE).into_owned()
}

fn first_fenced_block(text: &str) -> Option<&str> {
    FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn without_fences(text: &str) -> String {
    text.replace(FENCE, "").trim().to_string()
}

/// Parse `text` and keep the result only if it is an array or an object
fn parse_container(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) if value.is_array() || value.is_object() => Some(value),
        _ => None,
    }
}

/// Parse the text inside a `{"maybe": ...}` envelope and unwrap an array
fn wrapped_array(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(&format!("{{\"maybe\": {}}}", text)) {
        Ok(Value::Object(mut map)) => match map.remove("maybe") {
            Some(items @ Value::Array(_)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: recovering the same text twice gives the same result
        #[test]
        fn test_recovery_is_idempotent(text in ".{0,200}") {
            prop_assert_eq!(recover_json(&text), recover_json(&text));
        }

        /// Property: a JSON array survives arbitrary prose around it
        #[test]
        fn test_array_survives_prose(
            prefix in "[a-zA-Z ,.!]{0,40}",
            suffix in "[a-zA-Z ,.!]{0,40}",
            items in proptest::collection::vec(0i64..1000, 0..8),
        ) {
            let array = serde_json::to_string(&items).unwrap();
            let text = format!("{}{}{}", prefix, array, suffix);
            let recovered = recover_json(&text).unwrap();
            prop_assert_eq!(recovered.value, serde_json::json!(items));
        }
    }
}
