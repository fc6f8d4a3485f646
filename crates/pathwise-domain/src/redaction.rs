//! Redaction policy for answer-bearing fields

use serde::{Deserialize, Serialize};

/// Governs whether correct answers leave the system
///
/// Answers are only released when the caller both asked for them and is
/// authorized to see them. The default policy redacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RedactionPolicy {
    /// The caller asked to receive answers
    #[serde(default)]
    pub keep_answers: bool,

    /// The caller is allowed to receive answers
    #[serde(default)]
    pub authorized: bool,
}

impl RedactionPolicy {
    /// Create a policy from the two request flags
    pub fn new(keep_answers: bool, authorized: bool) -> Self {
        Self {
            keep_answers,
            authorized,
        }
    }

    /// Policy for an authorized caller that asked for answers
    pub fn reveal() -> Self {
        Self::new(true, true)
    }

    /// Whether answers survive this policy
    pub fn allows_answers(&self) -> bool {
        self.keep_answers && self.authorized
    }

    /// Answers were requested by a caller that may not have them
    pub fn is_disallowed_request(&self) -> bool {
        self.keep_answers && !self.authorized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_need_both_flags() {
        assert!(RedactionPolicy::new(true, true).allows_answers());
        assert!(!RedactionPolicy::new(true, false).allows_answers());
        assert!(!RedactionPolicy::new(false, true).allows_answers());
        assert!(!RedactionPolicy::default().allows_answers());
    }

    #[test]
    fn test_disallowed_request() {
        assert!(RedactionPolicy::new(true, false).is_disallowed_request());
        assert!(!RedactionPolicy::new(false, false).is_disallowed_request());
        assert!(!RedactionPolicy::reveal().is_disallowed_request());
    }
}
