//! Lens update errors.
//!
//! These are faults for the immediate caller: offering an out-of-range value
//! or an undeclared key is a UI or programming error, not a data condition.

use crate::error::{ErrorSeverity, RulesError};
use crate::schema::SchemaError;

/// Which bound a range violation crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RangeBound {
    TooSmall,
    TooBig,
}

/// Errors raised by [`Lens::update`](super::Lens::update).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LensError {
    /// The value falls outside the field's declared bounds.
    #[error("{field}: {bound} ({value} is outside [{min}, {max}])")]
    Range {
        field: String,
        value: i64,
        min: i64,
        max: i64,
        bound: RangeBound,
    },

    /// The update names a key the ruleset does not declare.
    #[error("unexpected key in {scope}: {key}")]
    UnknownKey { scope: &'static str, key: String },

    /// The update carries a value that fails a strict sub-schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl LensError {
    /// Checks `value` against `[min, max]` for `field`.
    pub fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<i64, Self> {
        let bound = if value < min {
            RangeBound::TooSmall
        } else if value > max {
            RangeBound::TooBig
        } else {
            return Ok(value);
        };
        Err(Self::Range {
            field: field.to_owned(),
            value,
            min,
            max,
            bound,
        })
    }
}

impl RulesError for LensError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Range { .. } | Self::UnknownKey { .. } => ErrorSeverity::Internal,
            Self::Schema(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Range {
                bound: RangeBound::TooSmall,
                ..
            } => "LENS_TOO_SMALL",
            Self::Range {
                bound: RangeBound::TooBig,
                ..
            } => "LENS_TOO_BIG",
            Self::UnknownKey { .. } => "LENS_UNKNOWN_KEY",
            Self::Schema(_) => "LENS_SCHEMA",
        }
    }
}
