//! Ruleset construction errors.

use crate::error::{ErrorSeverity, RulesError};

/// Errors raised while building a [`Ruleset`](super::Ruleset).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RulesetError {
    /// A stat or condition meter declares `min >= max`.
    #[error("`{key}`: min ({min}) must be less than max ({max})")]
    InvalidBounds { key: String, min: i64, max: i64 },
}

impl RulesError for RulesetError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidBounds { .. } => "RULESET_INVALID_BOUNDS",
        }
    }
}
