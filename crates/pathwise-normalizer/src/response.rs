//! Locate the answer text inside a provider-shaped model response
//!
//! Provider SDKs disagree about where the generated text lives. Each place we
//! know about is a small pure strategy; they are tried in order and the first
//! non-empty string wins.

use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Zero-argument text accessor exposed by some provider SDK responses
pub type TextAccessor = Box<dyn Fn() -> Result<String, String> + Send + Sync>;

/// Opaque response handed over by the model-calling collaborator
///
/// Created once per request and consumed by [`extract_text`].
pub struct RawModelResponse {
    text_accessor: Option<TextAccessor>,
    body: Value,
}

impl RawModelResponse {
    /// Response whose body is a plain string
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_body(Value::String(text.into()))
    }

    /// Response with a loosely-typed provider payload
    pub fn from_body(body: Value) -> Self {
        Self {
            text_accessor: None,
            body,
        }
    }

    /// Response with nothing in it
    pub fn empty() -> Self {
        Self::from_body(Value::Null)
    }

    /// Attach a text accessor, tried before any body lookup
    pub fn with_text_accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn() -> Result<String, String> + Send + Sync + 'static,
    {
        self.text_accessor = Some(Box::new(accessor));
        self
    }
}

impl fmt::Debug for RawModelResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawModelResponse")
            .field("text_accessor", &self.text_accessor.is_some())
            .field("body", &self.body)
            .finish()
    }
}

/// Which extraction path produced a candidate text
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextProvenance {
    /// The response's text accessor
    Accessor,
    /// The body was itself a string, or the caller passed raw text
    Plain,
    /// `body.text`
    TextField,
    /// `body.output[0].content[0].text`
    OutputContent,
    /// `body.choices[0].message.content`
    ChoicesMessage,
    /// `body.candidates[0].content.parts[0].text`
    CandidateParts,
    /// The whole body serialized as JSON
    SerializedBody,
    /// Nothing found
    Empty,
}

/// A string believed to hold the model's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateText {
    /// The text; possibly empty, never absent
    pub text: String,
    /// How it was found
    pub provenance: TextProvenance,
}

impl CandidateText {
    /// Raw text supplied directly by the caller
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provenance: TextProvenance::Plain,
        }
    }

    /// The empty candidate
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            provenance: TextProvenance::Empty,
        }
    }
}

type Strategy = fn(&RawModelResponse) -> Option<String>;

const STRATEGIES: &[(TextProvenance, Strategy)] = &[
    (TextProvenance::Accessor, from_accessor),
    (TextProvenance::Plain, from_plain_body),
    (TextProvenance::TextField, from_text_field),
    (TextProvenance::OutputContent, from_output_content),
    (TextProvenance::ChoicesMessage, from_choices_message),
    (TextProvenance::CandidateParts, from_candidate_parts),
    (TextProvenance::SerializedBody, from_serialized_body),
];

/// Extract the single best candidate text from a raw response
///
/// Never fails: when no strategy yields text the empty candidate is returned.
pub fn extract_text(raw: &RawModelResponse) -> CandidateText {
    for (provenance, strategy) in STRATEGIES {
        match strategy(raw) {
            Some(text) if !text.trim().is_empty() => {
                if *provenance != TextProvenance::Accessor {
                    debug!("Model text found via {:?}", provenance);
                }
                return CandidateText {
                    text,
                    provenance: *provenance,
                };
            }
            _ => debug!("No model text via {:?}", provenance),
        }
    }

    warn!("No text could be located in the model response");
    CandidateText::empty()
}

fn from_accessor(raw: &RawModelResponse) -> Option<String> {
    let accessor = raw.text_accessor.as_ref()?;
    match accessor() {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Response text accessor failed: {}", e);
            None
        }
    }
}

fn from_plain_body(raw: &RawModelResponse) -> Option<String> {
    raw.body.as_str().map(str::to_string)
}

fn from_text_field(raw: &RawModelResponse) -> Option<String> {
    string_at(&raw.body, "/text")
}

fn from_output_content(raw: &RawModelResponse) -> Option<String> {
    string_at(&raw.body, "/output/0/content/0/text")
}

fn from_choices_message(raw: &RawModelResponse) -> Option<String> {
    string_at(&raw.body, "/choices/0/message/content")
}

fn from_candidate_parts(raw: &RawModelResponse) -> Option<String> {
    string_at(&raw.body, "/candidates/0/content/parts/0/text")
}

fn from_serialized_body(raw: &RawModelResponse) -> Option<String> {
    if raw.body.is_null() {
        return None;
    }
    serde_json::to_string(&raw.body).ok()
}

fn string_at(body: &Value, pointer: &str) -> Option<String> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessor_wins() {
        let raw = RawModelResponse::from_body(json!({"text": "from body"}))
            .with_text_accessor(|| Ok("from accessor".to_string()));
        let candidate = extract_text(&raw);
        assert_eq!(candidate.text, "from accessor");
        assert_eq!(candidate.provenance, TextProvenance::Accessor);
    }

    #[test]
    fn test_failing_accessor_falls_through() {
        let raw = RawModelResponse::from_body(json!({"text": "from body"}))
            .with_text_accessor(|| Err("stream closed".to_string()));
        let candidate = extract_text(&raw);
        assert_eq!(candidate.text, "from body");
        assert_eq!(candidate.provenance, TextProvenance::TextField);
    }

    #[test]
    fn test_empty_accessor_falls_through() {
        let raw = RawModelResponse::from_text("[1]").with_text_accessor(|| Ok("  ".to_string()));
        assert_eq!(extract_text(&raw).provenance, TextProvenance::Plain);
    }

    #[test]
    fn test_output_content_path() {
        let raw = RawModelResponse::from_body(json!({
            "output": [{"content": [{"type": "output_text", "text": "[{\"a\":1}]"}]}]
        }));
        let candidate = extract_text(&raw);
        assert_eq!(candidate.text, "[{\"a\":1}]");
        assert_eq!(candidate.provenance, TextProvenance::OutputContent);
    }

    #[test]
    fn test_choices_message_path() {
        let raw = RawModelResponse::from_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        }));
        assert_eq!(extract_text(&raw).provenance, TextProvenance::ChoicesMessage);
    }

    #[test]
    fn test_candidate_parts_path() {
        let raw = RawModelResponse::from_body(json!({
            "candidates": [{"content": {"parts": [{"text": "hi"}]}}]
        }));
        let candidate = extract_text(&raw);
        assert_eq!(candidate.text, "hi");
        assert_eq!(candidate.provenance, TextProvenance::CandidateParts);
    }

    #[test]
    fn test_non_string_text_field_is_skipped() {
        let raw = RawModelResponse::from_body(json!({"text": {"value": "nested"}}));
        let candidate = extract_text(&raw);
        assert_eq!(candidate.provenance, TextProvenance::SerializedBody);
        assert!(candidate.text.contains("nested"));
    }

    #[test]
    fn test_unknown_shape_is_serialized() {
        let raw = RawModelResponse::from_body(json!({"questions": [{"question": "Q"}]}));
        let candidate = extract_text(&raw);
        assert_eq!(candidate.provenance, TextProvenance::SerializedBody);
        let reparsed: Value = serde_json::from_str(&candidate.text).unwrap();
        assert_eq!(reparsed["questions"][0]["question"], "Q");
    }

    #[test]
    fn test_empty_response_yields_empty_text() {
        let candidate = extract_text(&RawModelResponse::empty());
        assert_eq!(candidate, CandidateText::empty());
    }
}
