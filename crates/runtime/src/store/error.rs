//! Error types raised by document store implementations.

use rules_core::{ErrorSeverity, RulesError};
use thiserror::Error;

/// Errors surfaced by document store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {id}: {reason}")]
    Json { id: String, reason: String },

    #[error("{0}: document content is not a JSON object")]
    NotAnObject(String),

    #[error("invalid document identity {0:?}")]
    InvalidIdentity(String),
}

impl RulesError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Io(_) => ErrorSeverity::Recoverable,
            Self::Json { .. } | Self::NotAnObject(_) | Self::InvalidIdentity(_) => {
                ErrorSeverity::Validation
            }
            Self::LockPoisoned => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "STORE_LOCK_POISONED",
            Self::Io(_) => "STORE_IO",
            Self::Json { .. } => "STORE_JSON",
            Self::NotAnObject(_) => "STORE_NOT_AN_OBJECT",
            Self::InvalidIdentity(_) => "STORE_INVALID_IDENTITY",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
