//! Pathwise Normalizer
//!
//! Turns unreliable LLM output into validated roadmap phases, quiz questions
//! and exam questions.
//!
//! # Overview
//!
//! Models are asked for strict JSON and return JSON in fences, JSON wrapped in
//! prose, near-JSON, or objects whose payload sits under an unpredictable key.
//! The Normalizer recovers one JSON value from whatever text it gets, repairs
//! each record against its schema, falls back to deterministic placeholders
//! when nothing is usable, and strips answers before records leave.
//!
//! # Architecture
//!
//! ```text
//! RawModelResponse → Text Extractor → JSON Recovery → Shape Normalizer
//!                                                          ↓
//!                          Redaction ← Fallback (when empty or short)
//! ```
//!
//! Only malformed requests are errors. Every other failure is logged and
//! recovered from inside the pipeline.
//!
//! # Example Usage
//!
//! ```
//! use pathwise_domain::{RecordKind, RedactionPolicy};
//! use pathwise_normalizer::{NormalizeParams, Normalizer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let normalizer = Normalizer::default();
//! let params = NormalizeParams::new("Rust", 2);
//!
//! let text = r#"Sure! [{"question": "Q", "options": ["A", "B"], "answer": "A"}]"#;
//! let collection = normalizer.normalize(text, RecordKind::Quiz, &params, RedactionPolicy::default())?;
//!
//! // One recovered question, one placeholder, no answers on the wire
//! assert_eq!(collection.len(), 2);
//! assert!(collection.records.iter().all(|r| r.answer().is_none()));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod fallback;
mod normalize;
mod pipeline;
mod recovery;
mod redaction;
mod response;
mod schema;
mod slug;
mod types;


pub use config::NormalizerConfig;
pub use error::{NormalizeError, RecoveryFailure, SchemaViolation};
pub use fallback::{fallback_range, fallback_records, PLACEHOLDER_OPTIONS};
pub use normalize::{normalize_records, NormalizeOutcome};
pub use pipeline::Normalizer;
pub use recovery::{recover_json, JsonRecovery, RecoveredJson, RecoveryStrategy};
pub use redaction::{redact, redact_records};
pub use response::{extract_text, CandidateText, RawModelResponse, TextAccessor, TextProvenance};
pub use schema::{
    schema_for, AnswerPolicy, FieldShape, FieldSpec, RecordSchema, ShortfallPolicy, EXAM_SCHEMA,
    QUIZ_SCHEMA, ROADMAP_SCHEMA,
};
pub use slug::slugify;
pub use types::{
    CollectionMeta, CollectionSource, ModelOutput, NormalizeParams, NormalizedCollection,
};
