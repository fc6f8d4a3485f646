//! Pathwise Domain Layer
//!
//! The record shapes the career-roadmap application asks a language model to
//! produce, and the policy that decides whether answers may leave the system.
//!
//! ## Key Concepts
//!
//! - **RoadmapPhase**: one stage of a learning roadmap
//! - **QuizQuestion**: a practice question whose answer is one of its options
//! - **ExamQuestion**: a persisted paper question with id, explanation and difficulty
//! - **RecordOrigin**: whether a record came from the model, a fallback or the store
//! - **RedactionPolicy**: `keep_answers && authorized` releases answers, nothing else does
//!
//! ## Architecture
//!
//! Pure data and validation only. Parsing model output lives in
//! `pathwise-normalizer`; nothing here performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod difficulty;
pub mod kind;
pub mod record;
pub mod redaction;

// Re-exports for convenience
pub use difficulty::Difficulty;
pub use kind::RecordKind;
pub use record::{
    ExamQuestion, NormalizedRecord, QuizQuestion, RecordOrigin, RoadmapPhase, MIN_OPTIONS,
};
pub use redaction::RedactionPolicy;
