//! Record module - the normalized shapes handed back to the HTTP layer

use crate::{Difficulty, RecordKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fewest options a question may have and still be answerable
pub const MIN_OPTIONS: usize = 2;

/// Where a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrigin {
    /// Recovered from model output
    #[default]
    #[serde(rename = "ai")]
    Model,

    /// Synthesized placeholder
    Fallback,

    /// Loaded from the document store
    Stored,
}

impl RecordOrigin {
    /// Wire name of the origin
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordOrigin::Model => "ai",
            RecordOrigin::Fallback => "fallback",
            RecordOrigin::Stored => "stored",
        }
    }
}

impl fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One phase of a learning roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    /// Phase title
    pub phase: String,

    /// What the learner does in this phase
    pub description: String,

    /// Free-form duration ("1 month", "2-3 weeks")
    pub duration: String,

    /// Skills acquired, in the order the model listed them
    #[serde(default)]
    pub skills: Vec<String>,

    /// Learning resources, in the order the model listed them
    #[serde(default)]
    pub resources: Vec<String>,

    /// Provenance of the record
    #[serde(default)]
    pub source: RecordOrigin,
}

/// A practice quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Question text
    pub question: String,

    /// Answer options
    pub options: Vec<String>,

    /// Correct option; absent once redacted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// Provenance of the record
    #[serde(default)]
    pub source: RecordOrigin,
}

/// A question on an exam paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamQuestion {
    /// Stable identifier within the paper
    pub id: String,

    /// Question text
    pub question: String,

    /// Answer options
    pub options: Vec<String>,

    /// Correct option; absent once redacted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    /// Why the answer is correct
    #[serde(default)]
    pub explanation: String,

    /// Intended difficulty
    #[serde(default)]
    pub difficulty: Difficulty,

    /// Provenance of the record
    #[serde(default)]
    pub source: RecordOrigin,
}

/// Checks shared by both question shapes
fn validate_question(question: &str, options: &[String], answer: Option<&str>) -> Result<(), String> {
    if question.trim().is_empty() {
        return Err("question is empty".to_string());
    }
    if options.len() < MIN_OPTIONS {
        return Err(format!(
            "{} option(s), at least {} required",
            options.len(),
            MIN_OPTIONS
        ));
    }
    if let Some(answer) = answer {
        if !options.iter().any(|o| o == answer) {
            return Err(format!("answer '{}' is not one of the options", answer));
        }
    }
    Ok(())
}

impl QuizQuestion {
    /// Validate the question; a redacted question is checked without its answer
    pub fn validate(&self) -> Result<(), String> {
        validate_question(&self.question, &self.options, self.answer.as_deref())
    }
}

impl ExamQuestion {
    /// Validate the question; a redacted question is checked without its answer
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("id is empty".to_string());
        }
        validate_question(&self.question, &self.options, self.answer.as_deref())
    }
}

impl RoadmapPhase {
    /// Validate the phase
    pub fn validate(&self) -> Result<(), String> {
        if self.phase.trim().is_empty() {
            return Err("phase is empty".to_string());
        }
        Ok(())
    }
}

/// A schema-conformant record of any kind
///
/// Serialized without a tag so the wire shape is exactly the inner record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NormalizedRecord {
    /// Roadmap phase
    Roadmap(RoadmapPhase),
    /// Quiz question
    Quiz(QuizQuestion),
    /// Exam question
    Exam(ExamQuestion),
}

impl NormalizedRecord {
    /// Kind of this record
    pub fn kind(&self) -> RecordKind {
        match self {
            NormalizedRecord::Roadmap(_) => RecordKind::Roadmap,
            NormalizedRecord::Quiz(_) => RecordKind::Quiz,
            NormalizedRecord::Exam(_) => RecordKind::Exam,
        }
    }

    /// Provenance of this record
    pub fn source(&self) -> RecordOrigin {
        match self {
            NormalizedRecord::Roadmap(r) => r.source,
            NormalizedRecord::Quiz(q) => q.source,
            NormalizedRecord::Exam(q) => q.source,
        }
    }

    /// Overwrite the provenance of this record
    pub fn set_source(&mut self, source: RecordOrigin) {
        match self {
            NormalizedRecord::Roadmap(r) => r.source = source,
            NormalizedRecord::Quiz(q) => q.source = source,
            NormalizedRecord::Exam(q) => q.source = source,
        }
    }

    /// Correct answer, if this is a question that still carries one
    pub fn answer(&self) -> Option<&str> {
        match self {
            NormalizedRecord::Roadmap(_) => None,
            NormalizedRecord::Quiz(q) => q.answer.as_deref(),
            NormalizedRecord::Exam(q) => q.answer.as_deref(),
        }
    }

    /// Remove the answer field; a no-op for roadmap phases
    pub fn clear_answer(&mut self) {
        match self {
            NormalizedRecord::Roadmap(_) => {}
            NormalizedRecord::Quiz(q) => q.answer = None,
            NormalizedRecord::Exam(q) => q.answer = None,
        }
    }

    /// Options of a question, empty for roadmap phases
    pub fn options(&self) -> &[String] {
        match self {
            NormalizedRecord::Roadmap(_) => &[],
            NormalizedRecord::Quiz(q) => &q.options,
            NormalizedRecord::Exam(q) => &q.options,
        }
    }

    /// The one-line text a person would read first
    pub fn headline(&self) -> &str {
        match self {
            NormalizedRecord::Roadmap(r) => &r.phase,
            NormalizedRecord::Quiz(q) => &q.question,
            NormalizedRecord::Exam(q) => &q.question,
        }
    }

    /// Validate against the record's own predicate
    pub fn validate(&self) -> Result<(), String> {
        match self {
            NormalizedRecord::Roadmap(r) => r.validate(),
            NormalizedRecord::Quiz(q) => q.validate(),
            NormalizedRecord::Exam(q) => q.validate(),
        }
    }
}

impl From<RoadmapPhase> for NormalizedRecord {
    fn from(phase: RoadmapPhase) -> Self {
        NormalizedRecord::Roadmap(phase)
    }
}

impl From<QuizQuestion> for NormalizedRecord {
    fn from(question: QuizQuestion) -> Self {
        NormalizedRecord::Quiz(question)
    }
}

impl From<ExamQuestion> for NormalizedRecord {
    fn from(question: ExamQuestion) -> Self {
        NormalizedRecord::Exam(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(options: &[&str], answer: Option<&str>) -> QuizQuestion {
        QuizQuestion {
            question: "Q".to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.map(str::to_string),
            source: RecordOrigin::Model,
        }
    }

    #[test]
    fn test_valid_quiz_question() {
        assert!(quiz(&["A", "B"], Some("A")).validate().is_ok());
    }

    #[test]
    fn test_answer_must_match_exactly() {
        assert!(quiz(&["A", "B"], Some("a")).validate().is_err());
        assert!(quiz(&["A", "B"], Some("Z")).validate().is_err());
    }

    #[test]
    fn test_too_few_options() {
        assert!(quiz(&["A"], Some("A")).validate().is_err());
    }

    #[test]
    fn test_redacted_question_still_validates() {
        assert!(quiz(&["A", "B"], None).validate().is_ok());
    }

    #[test]
    fn test_exam_requires_id() {
        let exam = ExamQuestion {
            id: " ".to_string(),
            question: "Q".to_string(),
            options: vec!["A".to_string(), "B".to_string()],
            answer: Some("A".to_string()),
            explanation: String::new(),
            difficulty: Difficulty::Easy,
            source: RecordOrigin::Model,
        };
        assert!(exam.validate().is_err());
    }

    #[test]
    fn test_redacted_answer_is_omitted_on_the_wire() {
        let record = NormalizedRecord::from(quiz(&["A", "B"], None));
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("answer").is_none());
        assert_eq!(json["question"], "Q");
        assert_eq!(json["source"], "ai");
    }

    #[test]
    fn test_clear_answer() {
        let mut record = NormalizedRecord::from(quiz(&["A", "B"], Some("B")));
        assert_eq!(record.answer(), Some("B"));
        record.clear_answer();
        assert_eq!(record.answer(), None);
    }

    #[test]
    fn test_origin_serialization() {
        assert_eq!(serde_json::to_string(&RecordOrigin::Fallback).unwrap(), "\"fallback\"");
        assert_eq!(serde_json::to_string(&RecordOrigin::Stored).unwrap(), "\"stored\"");
        let parsed: RecordOrigin = serde_json::from_str("\"ai\"").unwrap();
        assert_eq!(parsed, RecordOrigin::Model);
    }
}
