//! Error types for the Normalizer
//!
//! Only [`NormalizeError`] ever reaches a caller. The other two types tag why
//! a pipeline stage produced nothing; they are logged and recovered locally.

use thiserror::Error;

/// Malformed requests; the only failures surfaced to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Requested count must be positive
    #[error("Invalid count: {0} (must be greater than 0)")]
    InvalidCount(usize),

    /// Requested count exceeds the configured maximum
    #[error("Count too large: {requested} (max: {max})")]
    CountTooLarge {
        /// Count the caller asked for
        requested: usize,
        /// Configured ceiling
        max: usize,
    },

    /// Topic is missing or blank
    #[error("Topic is required")]
    MissingTopic,

    /// Difficulty is not one of easy, medium or hard
    #[error("Invalid difficulty: {0}")]
    InvalidDifficulty(String),

    /// Answers were requested without authorization
    #[error("Answers requested without authorization")]
    UnauthorizedAnswerRequest,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why no JSON value could be recovered from a candidate text
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryFailure {
    /// Nothing but whitespace to search
    #[error("candidate text is empty")]
    EmptyInput,

    /// Every strategy failed
    #[error("no JSON array or object found in {0} bytes")]
    NoJsonFound(usize),
}

/// Why a single record was dropped by the shape normalizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// Element of the payload array was not an object
    #[error("record is not a JSON object")]
    NotAnObject,

    /// A required field resolved to nothing
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// Question has too few usable options
    #[error("{found} usable option(s), at least {required} required")]
    TooFewOptions {
        /// Options left after cleaning
        found: usize,
        /// Minimum accepted
        required: usize,
    },

    /// Answer is not a case-exact member of the options
    #[error("answer '{0}' is not one of the options")]
    AnswerNotInOptions(String),
}
