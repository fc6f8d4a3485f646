//! Coerce untrusted JSON into schema-conformant records

use crate::config::NormalizerConfig;
use crate::error::SchemaViolation;
use crate::schema::{AnswerPolicy, RecordSchema, ResolvedRecord};
use crate::types::NormalizeParams;
use pathwise_domain::{
    Difficulty, ExamQuestion, NormalizedRecord, QuizQuestion, RecordKind, RecordOrigin,
    RoadmapPhase, MIN_OPTIONS,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Keys under which models nest the record array, checked first
const PAYLOAD_KEYS: &[&str] = &[
    "questions",
    "roadmap",
    "phases",
    "items",
    "data",
    "results",
    "paper",
    "quiz",
    "exam",
];

const MAX_UNWRAP_DEPTH: usize = 3;

const DEFAULT_DURATION: &str = "Flexible";

/// Records that survived normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeOutcome {
    /// Valid records in original order, truncated to the requested count
    pub records: Vec<NormalizedRecord>,
    /// Records dropped for violating the schema
    pub dropped: usize,
}

/// Normalize a recovered JSON value against `schema`
///
/// Never fails; unusable records are dropped and counted. The result is at
/// most `params.count` long and padding is left to the caller.
pub fn normalize_records(
    value: &Value,
    schema: &RecordSchema,
    params: &NormalizeParams,
    config: &NormalizerConfig,
) -> NormalizeOutcome {
    let items = payload_items(value, schema, 0);
    let mut outcome = NormalizeOutcome::default();

    for (idx, item) in items.iter().enumerate() {
        if outcome.records.len() == params.count {
            break;
        }
        match normalize_one(item, idx, schema, params, config) {
            Ok(record) => outcome.records.push(record),
            Err(violation) => {
                warn!("{} record {} dropped: {}", schema.kind, idx, violation);
                outcome.dropped += 1;
            }
        }
    }

    debug!(
        "Normalized {} {} record(s) from {} candidate(s), {} dropped",
        outcome.records.len(),
        schema.kind,
        items.len(),
        outcome.dropped
    );
    outcome
}

/// Find the array of candidate records inside a recovered value
///
/// An array is used as is. An object that looks like a record is treated as a
/// one-element array; otherwise the array under a well-known key, or the first
/// array of objects in document order, is used.
fn payload_items<'a>(value: &'a Value, schema: &RecordSchema, depth: usize) -> Vec<&'a Value> {
    let object = match value {
        Value::Array(items) => return items.iter().collect(),
        Value::Object(object) => object,
        _ => return Vec::new(),
    };

    if schema.looks_like_record(object) || depth >= MAX_UNWRAP_DEPTH {
        return vec![value];
    }

    for key in PAYLOAD_KEYS {
        match object.get(*key) {
            Some(Value::Array(items)) => return items.iter().collect(),
            Some(nested @ Value::Object(_)) => {
                let items = payload_items(nested, schema, depth + 1);
                if items.iter().any(|item| item.is_object()) {
                    return items;
                }
            }
            _ => {}
        }
    }

    let nested = object.values().find_map(|v| match v {
        Value::Array(items) if items.iter().any(Value::is_object) => Some(items),
        _ => None,
    });
    match nested {
        Some(items) => items.iter().collect(),
        None => vec![value],
    }
}

fn normalize_one(
    item: &Value,
    idx: usize,
    schema: &RecordSchema,
    params: &NormalizeParams,
    config: &NormalizerConfig,
) -> Result<NormalizedRecord, SchemaViolation> {
    let object = item.as_object().ok_or(SchemaViolation::NotAnObject)?;
    let position = idx + 1;

    match schema.kind {
        RecordKind::Roadmap => roadmap_phase(schema, object, position).map(Into::into),
        RecordKind::Quiz => quiz_question(schema, object, config).map(Into::into),
        RecordKind::Exam => exam_question(schema, object, position, params, config).map(Into::into),
    }
}

fn roadmap_phase(
    schema: &RecordSchema,
    object: &Map<String, Value>,
    position: usize,
) -> Result<RoadmapPhase, SchemaViolation> {
    let mut fields = schema.resolve(object);
    if !fields.is_present("phase") && !fields.is_present("description") {
        return Err(SchemaViolation::MissingField("phase"));
    }

    Ok(RoadmapPhase {
        phase: fields.text_or("phase", || format!("Phase {}", position)),
        description: fields.text("description").unwrap_or_default(),
        duration: fields.text_or("duration", || DEFAULT_DURATION.to_string()),
        skills: fields.list("skills"),
        resources: fields.list("resources"),
        source: RecordOrigin::Model,
    })
}

fn quiz_question(
    schema: &RecordSchema,
    object: &Map<String, Value>,
    config: &NormalizerConfig,
) -> Result<QuizQuestion, SchemaViolation> {
    let mut fields = schema.resolve(object);
    let (question, options, answer) = question_parts(schema, &mut fields, config)?;

    Ok(QuizQuestion {
        question,
        options,
        answer: Some(answer),
        source: RecordOrigin::Model,
    })
}

fn exam_question(
    schema: &RecordSchema,
    object: &Map<String, Value>,
    position: usize,
    params: &NormalizeParams,
    config: &NormalizerConfig,
) -> Result<ExamQuestion, SchemaViolation> {
    let mut fields = schema.resolve(object);
    let (question, options, answer) = question_parts(schema, &mut fields, config)?;

    let difficulty = fields
        .text("difficulty")
        .and_then(|d| Difficulty::parse(&d))
        .unwrap_or_else(|| params.difficulty_or_default());

    Ok(ExamQuestion {
        id: fields.text_or("id", || format!("{}-q{}", params.topic_slug(), position)),
        question,
        options,
        answer: Some(answer),
        explanation: fields.text("explanation").unwrap_or_default(),
        difficulty,
        source: RecordOrigin::Model,
    })
}

/// Question text, cleaned options and a validated answer
fn question_parts(
    schema: &RecordSchema,
    fields: &mut ResolvedRecord,
    config: &NormalizerConfig,
) -> Result<(String, Vec<String>, String), SchemaViolation> {
    let question = fields
        .text("question")
        .ok_or(SchemaViolation::MissingField("question"))?;

    let mut options = fields.list("options");
    if schema.cap_options {
        options.truncate(config.max_quiz_options);
    }
    // An unvalidated config may ask for fewer options than a question needs
    let required = config.min_options.max(MIN_OPTIONS);
    let first = match options.first() {
        Some(first) if options.len() >= required => first.clone(),
        _ => {
            return Err(SchemaViolation::TooFewOptions {
                found: options.len(),
                required,
            })
        }
    };

    let answer = fields.text("answer");
    let answer = match (answer, schema.answers) {
        (Some(answer), _) if options.contains(&answer) => answer,
        (answer, Some(AnswerPolicy::SubstituteFirst)) => {
            debug!("Answer {:?} not among options, substituting '{}'", answer, first);
            first
        }
        (Some(answer), _) => return Err(SchemaViolation::AnswerNotInOptions(answer)),
        (None, _) => return Err(SchemaViolation::MissingField("answer")),
    };

    Ok((question, options, answer))
}
