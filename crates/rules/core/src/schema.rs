//! Schema validation errors and field readers for raw records.
//!
//! Every reader names the field it was asked for, so a failure carries the
//! path needed to point a user at the broken entry.

use serde_json::Value;

use crate::error::{ErrorSeverity, RulesError};
use crate::record::RawRecord;

/// Raw content does not satisfy the schema derived from a ruleset.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {reason}")]
pub struct SchemaError {
    /// Field path, e.g. `wits` or `assets[0]`.
    pub path: String,
    /// What was wrong with the field.
    pub reason: SchemaReason,
}

impl SchemaError {
    pub fn new(path: impl Into<String>, reason: SchemaReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, SchemaReason::Missing)
    }
}

/// Reason attached to a [`SchemaError`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaReason {
    #[error("required field is missing")]
    Missing,

    #[error("invalid_type: expected {expected}, received {received}")]
    InvalidType {
        expected: &'static str,
        received: &'static str,
    },

    #[error("too_small: {value} is less than the minimum of {min}")]
    TooSmall { value: i64, min: i64 },

    #[error("too_big: {value} is greater than the maximum of {max}")]
    TooBig { value: i64, max: i64 },

    #[error("invalid value: {0}")]
    Invalid(String),
}

impl RulesError for SchemaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self.reason {
            SchemaReason::Missing => "SCHEMA_MISSING",
            SchemaReason::InvalidType { .. } => "SCHEMA_INVALID_TYPE",
            SchemaReason::TooSmall { .. } => "SCHEMA_TOO_SMALL",
            SchemaReason::TooBig { .. } => "SCHEMA_TOO_BIG",
            SchemaReason::Invalid(_) => "SCHEMA_INVALID",
        }
    }
}

/// Short name of a JSON value's type, used in `invalid_type` reasons.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn invalid_type(key: &str, expected: &'static str, value: &Value) -> SchemaError {
    SchemaError::new(
        key,
        SchemaReason::InvalidType {
            expected,
            received: value_kind(value),
        },
    )
}

/// Reads an optional integer field. `null` counts as absent.
pub fn optional_integer(record: &RawRecord, key: &str) -> Result<Option<i64>, SchemaError> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| invalid_type(key, "integer", value)),
    }
}

/// Reads a required integer field.
pub fn require_integer(record: &RawRecord, key: &str) -> Result<i64, SchemaError> {
    optional_integer(record, key)?.ok_or_else(|| SchemaError::missing(key))
}

/// Reads a required integer field and checks it against `[min, max]`.
pub fn require_integer_in(
    record: &RawRecord,
    key: &str,
    min: i64,
    max: i64,
) -> Result<i64, SchemaError> {
    let value = require_integer(record, key)?;
    check_range(key, value, min, max)
}

/// Checks an integer against `[min, max]`, naming `key` on failure.
pub fn check_range(key: &str, value: i64, min: i64, max: i64) -> Result<i64, SchemaError> {
    if value < min {
        Err(SchemaError::new(key, SchemaReason::TooSmall { value, min }))
    } else if value > max {
        Err(SchemaError::new(key, SchemaReason::TooBig { value, max }))
    } else {
        Ok(value)
    }
}

/// Reads an optional string field. `null` counts as absent.
pub fn optional_string<'a>(record: &'a RawRecord, key: &str) -> Result<Option<&'a str>, SchemaError> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(value) => Err(invalid_type(key, "string", value)),
    }
}

/// Reads a required string field.
pub fn require_string<'a>(record: &'a RawRecord, key: &str) -> Result<&'a str, SchemaError> {
    optional_string(record, key)?.ok_or_else(|| SchemaError::missing(key))
}

/// Reads an optional boolean field. `null` counts as absent.
pub fn optional_bool(record: &RawRecord, key: &str) -> Result<Option<bool>, SchemaError> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(value) => Err(invalid_type(key, "boolean", value)),
    }
}

/// Reads a required boolean field.
pub fn require_bool(record: &RawRecord, key: &str) -> Result<bool, SchemaError> {
    optional_bool(record, key)?.ok_or_else(|| SchemaError::missing(key))
}
