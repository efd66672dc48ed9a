//! Unified error types surfaced by the runtime.
//!
//! Wraps store failures and the core's validation and lens errors so callers
//! can bubble them up with consistent context.

use rules_core::{
    DiceError, DocumentKind, ErrorSeverity, LensError, RulesError, SchemaError,
};
use thiserror::Error;

pub use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The identity is not in the relevant index, or its current content no
    /// longer validates.
    #[error("{id}: the target is not a valid {kind} document")]
    NotIndexed { kind: DocumentKind, id: String },

    /// The document changed in the store between the read and the write of
    /// a read-modify-write cycle.
    #[error("{id}: document changed since it was read (expected {expected}, found {found})")]
    Conflict {
        id: String,
        expected: String,
        found: String,
    },

    #[error("unknown oracle {0}")]
    UnknownOracle(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lens(#[from] LensError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Dice(#[from] DiceError),
}

impl RulesError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotIndexed { .. } | Self::UnknownOracle(_) => ErrorSeverity::Validation,
            Self::Conflict { .. } => ErrorSeverity::Recoverable,
            Self::Store(err) => err.severity(),
            Self::Lens(err) => err.severity(),
            Self::Schema(err) => err.severity(),
            Self::Dice(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotIndexed { .. } => "RUNTIME_NOT_INDEXED",
            Self::Conflict { .. } => "RUNTIME_CONFLICT",
            Self::UnknownOracle(_) => "RUNTIME_UNKNOWN_ORACLE",
            Self::Store(err) => err.error_code(),
            Self::Lens(err) => err.error_code(),
            Self::Schema(err) => err.error_code(),
            Self::Dice(err) => err.error_code(),
        }
    }
}
