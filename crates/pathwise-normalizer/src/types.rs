//! Request and response types for normalization

use crate::config::NormalizerConfig;
use crate::error::NormalizeError;
use crate::recovery::RecoveryStrategy;
use crate::response::{RawModelResponse, TextProvenance};
use crate::slug::slugify;
use pathwise_domain::{Difficulty, NormalizedRecord, RecordKind};
use serde::Serialize;

/// Model output handed to the pipeline
#[derive(Debug, Clone, Copy)]
pub enum ModelOutput<'a> {
    /// Provider-shaped response
    Raw(&'a RawModelResponse),
    /// Text the caller already pulled out of the response
    Text(&'a str),
}

impl<'a> From<&'a RawModelResponse> for ModelOutput<'a> {
    fn from(raw: &'a RawModelResponse) -> Self {
        ModelOutput::Raw(raw)
    }
}

impl<'a> From<&'a str> for ModelOutput<'a> {
    fn from(text: &'a str) -> Self {
        ModelOutput::Text(text)
    }
}

/// Request parameters that shape the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeParams {
    /// Number of records wanted
    pub count: usize,

    /// Topic or goal the records are about
    pub topic: String,

    /// Requested difficulty, if any
    pub difficulty: Option<Difficulty>,

    /// Optional sub-topics, cycled through by fallback records
    pub sub_topics: Vec<String>,
}

impl NormalizeParams {
    /// Parameters for `count` records about `topic`
    pub fn new(topic: impl Into<String>, count: usize) -> Self {
        Self {
            count,
            topic: topic.into(),
            difficulty: None,
            sub_topics: Vec::new(),
        }
    }

    /// Set the requested difficulty
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Set sub-topics from a comma-separated request field
    pub fn with_sub_topics(mut self, sub_topics: &str) -> Self {
        self.sub_topics = sub_topics
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    /// Build parameters from raw request fields
    pub fn from_request(
        topic: &str,
        count: usize,
        difficulty: Option<&str>,
        sub_topics: Option<&str>,
    ) -> Result<Self, NormalizeError> {
        let mut params = Self::new(topic.trim(), count);
        if let Some(raw) = difficulty.filter(|d| !d.trim().is_empty()) {
            let parsed = Difficulty::parse(raw)
                .ok_or_else(|| NormalizeError::InvalidDifficulty(raw.to_string()))?;
            params = params.with_difficulty(parsed);
        }
        if let Some(sub_topics) = sub_topics {
            params = params.with_sub_topics(sub_topics);
        }
        Ok(params)
    }

    /// Reject malformed requests
    pub fn validate(&self, config: &NormalizerConfig) -> Result<(), NormalizeError> {
        if self.topic.trim().is_empty() {
            return Err(NormalizeError::MissingTopic);
        }
        if self.count == 0 {
            return Err(NormalizeError::InvalidCount(self.count));
        }
        if self.count > config.max_count {
            return Err(NormalizeError::CountTooLarge {
                requested: self.count,
                max: config.max_count,
            });
        }
        Ok(())
    }

    /// Difficulty to use when neither the request nor the record names one
    pub fn difficulty_or_default(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }

    /// Slug of the topic for identifiers
    pub fn topic_slug(&self) -> String {
        slugify(&self.topic)
    }

    /// Sub-topic for the record at `index`, cycling through the list
    pub fn sub_topic(&self, index: usize) -> Option<&str> {
        if self.sub_topics.is_empty() {
            None
        } else {
            Some(self.sub_topics[index % self.sub_topics.len()].as_str())
        }
    }
}

/// Where a collection's records came from overall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionSource {
    /// Every record was recovered from model output
    Model,
    /// Model records topped up with fallback records
    Padded,
    /// Every record is a fallback
    Fallback,
    /// Records came from the document store
    Stored,
}

/// Diagnostics carried alongside the records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionMeta {
    /// Count the caller asked for
    pub requested: usize,

    /// Count actually returned
    pub count: usize,

    /// Overall provenance
    pub source: CollectionSource,

    /// Extraction path of the model text, when there was model output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_provenance: Option<TextProvenance>,

    /// Strategy that recovered JSON, when recovery succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery: Option<RecoveryStrategy>,

    /// Records dropped for violating their schema
    pub dropped: usize,

    /// Unix seconds when the collection was assembled
    pub generated_at: u64,
}

/// Ordered, validated records ready to cross the system boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedCollection {
    /// Record kind of every element
    pub kind: RecordKind,

    /// The records, in model order
    pub records: Vec<NormalizedRecord>,

    /// Diagnostics
    pub meta: CollectionMeta,
}

impl NormalizedCollection {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_request_parses_fields() {
        let params =
            NormalizeParams::from_request(" Rust ", 5, Some("HARD"), Some("ownership, , traits"))
                .unwrap();
        assert_eq!(params.topic, "Rust");
        assert_eq!(params.difficulty, Some(Difficulty::Hard));
        assert_eq!(params.sub_topics, vec!["ownership", "traits"]);
    }

    #[test]
    fn test_from_request_rejects_unknown_difficulty() {
        let err = NormalizeParams::from_request("Rust", 5, Some("brutal"), None).unwrap_err();
        assert_eq!(err, NormalizeError::InvalidDifficulty("brutal".to_string()));
    }

    #[test]
    fn test_blank_difficulty_is_ignored() {
        let params = NormalizeParams::from_request("Rust", 5, Some(" "), None).unwrap();
        assert_eq!(params.difficulty, None);
        assert_eq!(params.difficulty_or_default(), Difficulty::Medium);
    }

    #[test]
    fn test_validate() {
        let config = NormalizerConfig::default();
        assert!(NormalizeParams::new("Rust", 3).validate(&config).is_ok());
        assert_eq!(
            NormalizeParams::new("  ", 3).validate(&config),
            Err(NormalizeError::MissingTopic)
        );
        assert_eq!(
            NormalizeParams::new("Rust", 0).validate(&config),
            Err(NormalizeError::InvalidCount(0))
        );
        assert!(matches!(
            NormalizeParams::new("Rust", 51).validate(&config),
            Err(NormalizeError::CountTooLarge { requested: 51, max: 50 })
        ));
    }

    #[test]
    fn test_sub_topic_cycles() {
        let params = NormalizeParams::new("Rust", 5).with_sub_topics("a,b");
        assert_eq!(params.sub_topic(0), Some("a"));
        assert_eq!(params.sub_topic(1), Some("b"));
        assert_eq!(params.sub_topic(2), Some("a"));
        assert_eq!(NormalizeParams::new("Rust", 1).sub_topic(0), None);
    }
}
