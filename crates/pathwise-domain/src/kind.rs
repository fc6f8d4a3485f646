//! Record kinds produced by the normalization pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three record shapes the application asks the model for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// One phase of a learning roadmap
    Roadmap,

    /// A practice quiz question
    Quiz,

    /// A question on a persisted exam paper
    Exam,
}

impl RecordKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Roadmap => "roadmap",
            RecordKind::Quiz => "quiz",
            RecordKind::Exam => "exam",
        }
    }

    /// Parse a kind from a string, accepting a few common synonyms
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "roadmap" | "phase" | "phases" => Some(RecordKind::Roadmap),
            "quiz" => Some(RecordKind::Quiz),
            "exam" | "paper" | "question-paper" => Some(RecordKind::Exam),
            _ => None,
        }
    }

    /// Whether records of this kind carry an answer field
    pub fn is_question(&self) -> bool {
        matches!(self, RecordKind::Quiz | RecordKind::Exam)
    }
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid record kind: {}", s))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_synonyms() {
        assert_eq!(RecordKind::parse("Roadmap"), Some(RecordKind::Roadmap));
        assert_eq!(RecordKind::parse("paper"), Some(RecordKind::Exam));
        assert_eq!(RecordKind::parse("QUIZ"), Some(RecordKind::Quiz));
        assert_eq!(RecordKind::parse("survey"), None);
    }

    #[test]
    fn test_question_kinds() {
        assert!(RecordKind::Quiz.is_question());
        assert!(RecordKind::Exam.is_question());
        assert!(!RecordKind::Roadmap.is_question());
    }
}
