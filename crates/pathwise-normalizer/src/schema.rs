//! Declarative record schemas and the generic alias resolver
//!
//! Each schema lists its canonical fields with the aliases models actually
//! use, in order of preference. One resolver walks any schema, so a new record
//! type is a new table rather than new lookup code.

use pathwise_domain::RecordKind;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Whether a field holds free text or an ordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Trimmed string
    Text,
    /// Ordered sequence of strings
    List,
}

/// One canonical field and the names it may arrive under
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Name downstream consumers rely on
    pub canonical: &'static str,
    /// Accepted names, most preferred first; includes the canonical name
    pub aliases: &'static [&'static str],
    /// Expected shape after coercion
    pub shape: FieldShape,
}

/// What to do when fewer valid records survive than were requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortfallPolicy {
    /// Top up with fallback records to the exact count
    Pad,
    /// Return the short list as is
    AcceptShort,
}

/// What to do when a question's answer is not one of its options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerPolicy {
    /// Use the first option as the answer
    SubstituteFirst,
    /// Drop the record
    Reject,
}

/// Language-agnostic description of one target record type
#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    /// Record type this schema describes
    pub kind: RecordKind,
    /// Canonical fields; the first one identifies a lone record object
    pub fields: &'static [FieldSpec],
    /// Behavior when the model returns too few usable records
    pub shortfall: ShortfallPolicy,
    /// Answer repair policy; `None` for records without answers
    pub answers: Option<AnswerPolicy>,
    /// Cap options at `NormalizerConfig::max_quiz_options`
    pub cap_options: bool,
}

const QUESTION_ALIASES: &[&str] = &["question", "prompt", "q", "text", "title"];
const OPTION_ALIASES: &[&str] = &["options", "choices", "answers", "alternatives"];
const ANSWER_ALIASES: &[&str] = &[
    "answer",
    "correctAnswer",
    "correct_answer",
    "correct",
    "solution",
];

/// Roadmap phases; short lists are accepted
pub static ROADMAP_SCHEMA: RecordSchema = RecordSchema {
    kind: RecordKind::Roadmap,
    fields: &[
        FieldSpec {
            canonical: "phase",
            aliases: &["phase", "name", "title", "stage", "phase_name", "phaseName"],
            shape: FieldShape::Text,
        },
        FieldSpec {
            canonical: "description",
            aliases: &["description", "desc", "summary", "details", "overview"],
            shape: FieldShape::Text,
        },
        FieldSpec {
            canonical: "duration",
            aliases: &[
                "duration",
                "timeframe",
                "timeline",
                "time",
                "estimated_time",
                "estimatedTime",
            ],
            shape: FieldShape::Text,
        },
        FieldSpec {
            canonical: "skills",
            aliases: &[
                "skills",
                "essential_skills",
                "key_skills",
                "skillsToLearn",
                "topics",
            ],
            shape: FieldShape::List,
        },
        FieldSpec {
            canonical: "resources",
            aliases: &[
                "resources",
                "links",
                "learning_resources",
                "materials",
                "references",
            ],
            shape: FieldShape::List,
        },
    ],
    shortfall: ShortfallPolicy::AcceptShort,
    answers: None,
    cap_options: false,
};

/// Quiz questions; bad answers are repaired and short lists padded
pub static QUIZ_SCHEMA: RecordSchema = RecordSchema {
    kind: RecordKind::Quiz,
    fields: &[
        FieldSpec {
            canonical: "question",
            aliases: QUESTION_ALIASES,
            shape: FieldShape::Text,
        },
        FieldSpec {
            canonical: "options",
            aliases: OPTION_ALIASES,
            shape: FieldShape::List,
        },
        FieldSpec {
            canonical: "answer",
            aliases: ANSWER_ALIASES,
            shape: FieldShape::Text,
        },
    ],
    shortfall: ShortfallPolicy::Pad,
    answers: Some(AnswerPolicy::SubstituteFirst),
    cap_options: true,
};

/// Exam questions; bad answers are rejected and short lists accepted
pub static EXAM_SCHEMA: RecordSchema = RecordSchema {
    kind: RecordKind::Exam,
    fields: &[
        FieldSpec {
            canonical: "question",
            aliases: QUESTION_ALIASES,
            shape: FieldShape::Text,
        },
        FieldSpec {
            canonical: "id",
            aliases: &["id", "_id", "questionId", "question_id"],
            shape: FieldShape::Text,
        },
        FieldSpec {
            canonical: "options",
            aliases: OPTION_ALIASES,
            shape: FieldShape::List,
        },
        FieldSpec {
            canonical: "answer",
            aliases: ANSWER_ALIASES,
            shape: FieldShape::Text,
        },
        FieldSpec {
            canonical: "explanation",
            aliases: &["explanation", "rationale", "reason", "explain"],
            shape: FieldShape::Text,
        },
        FieldSpec {
            canonical: "difficulty",
            aliases: &["difficulty", "level"],
            shape: FieldShape::Text,
        },
    ],
    shortfall: ShortfallPolicy::AcceptShort,
    answers: Some(AnswerPolicy::Reject),
    cap_options: false,
};

/// The schema for a record kind
pub fn schema_for(kind: RecordKind) -> &'static RecordSchema {
    match kind {
        RecordKind::Roadmap => &ROADMAP_SCHEMA,
        RecordKind::Quiz => &QUIZ_SCHEMA,
        RecordKind::Exam => &EXAM_SCHEMA,
    }
}

impl RecordSchema {
    /// Whether an object carries any alias of the schema's identifying field
    pub fn looks_like_record(&self, object: &Map<String, Value>) -> bool {
        self.fields
            .first()
            .map(|spec| spec.aliases.iter().any(|alias| object.contains_key(*alias)))
            .unwrap_or(false)
    }

    /// Resolve every canonical field of `object`
    pub fn resolve(&self, object: &Map<String, Value>) -> ResolvedRecord {
        let fields = self
            .fields
            .iter()
            .map(|spec| (spec.canonical, resolve_field(object, spec)))
            .collect();
        ResolvedRecord { fields }
    }
}

/// A field after alias resolution and coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Coerced text
    Text(String),
    /// Coerced list
    List(Vec<String>),
    /// No alias held a usable value
    Absent,
}

/// Canonical view of one raw record
#[derive(Debug, Clone, Default)]
pub struct ResolvedRecord {
    fields: HashMap<&'static str, Resolved>,
}

impl ResolvedRecord {
    /// Take a text field, `None` when absent or blank
    pub fn text(&mut self, canonical: &str) -> Option<String> {
        match self.fields.remove(canonical) {
            Some(Resolved::Text(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }

    /// Take a text field or fall back to `default`
    pub fn text_or(&mut self, canonical: &str, default: impl FnOnce() -> String) -> String {
        self.text(canonical).unwrap_or_else(default)
    }

    /// Take a list field, empty when absent
    pub fn list(&mut self, canonical: &str) -> Vec<String> {
        match self.fields.remove(canonical) {
            Some(Resolved::List(items)) => items,
            _ => Vec::new(),
        }
    }

    /// Whether a field resolved to a usable value
    pub fn is_present(&self, canonical: &str) -> bool {
        !matches!(self.fields.get(canonical), None | Some(Resolved::Absent))
    }
}

/// Scan aliases in order and coerce the first present, non-empty value
pub fn resolve_field(object: &Map<String, Value>, spec: &FieldSpec) -> Resolved {
    let found = spec
        .aliases
        .iter()
        .filter_map(|alias| object.get(*alias))
        .find(|value| is_present(value));

    let Some(value) = found else {
        return Resolved::Absent;
    };

    match spec.shape {
        FieldShape::Text => match coerce_text(value) {
            Some(text) => Resolved::Text(text),
            None => Resolved::Absent,
        },
        FieldShape::List => match coerce_list(value) {
            items if items.is_empty() => Resolved::Absent,
            items => Resolved::List(items),
        },
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Stringify a scalar, a list of scalars or a labelled object into trimmed text
fn coerce_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(coerce_item)
            .collect::<Vec<_>>()
            .join(", "),
        other => coerce_item(other)?,
    };
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Stringify every element, dropping null, `false` and blank entries
///
/// A lone string becomes a one-element list and an object of options such
/// as `{"A": "...", "B": "..."}` becomes its values in document order.
fn coerce_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(coerce_item).collect(),
        Value::Object(map) if label_of(map).is_none() => {
            map.values().filter_map(coerce_item).collect()
        }
        other => coerce_item(other).into_iter().collect(),
    }
}

fn coerce_item(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null | Value::Bool(false) => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(map) => match label_of(map) {
            Some(label) => label,
            None => Value::Object(map.clone()).to_string(),
        },
        Value::Array(_) => value.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Readable label of an object like `{"title": "...", "url": "..."}`
fn label_of(map: &Map<String, Value>) -> Option<String> {
    const LABEL_KEYS: &[&str] = &["title", "name", "text", "label", "value"];
    const LINK_KEYS: &[&str] = &["url", "link", "href"];

    let find = |keys: &[&str]| {
        keys.iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    };

    match (find(LABEL_KEYS), find(LINK_KEYS)) {
        (Some(label), Some(link)) => Some(format!("{} ({})", label, link)),
        (Some(label), None) => Some(label),
        (None, Some(link)) => Some(link),
        (None, None) => None,
    }
}
