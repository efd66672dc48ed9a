//! Common error infrastructure for rules-core.
//!
//! This module provides the severity classification and the trait shared by
//! every error type in the crate. Domain-specific errors (e.g. [`SchemaError`],
//! [`LensError`]) are defined next to the code that produces them.
//!
//! # Design Principles
//!
//! - **Values, not panics**: validation failures are returned so that a scan
//!   over many documents can skip one bad document and keep going
//! - **Path-qualified**: schema failures name the offending field
//! - **Stable codes**: every variant maps to a static identifier for tests and logs
//!
//! [`SchemaError`]: crate::schema::SchemaError
//! [`LensError`]: crate::lens::LensError

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same request may succeed once the environment changes
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: a caller offered a choice it should never have offered
/// - **Fatal**: the rules themselves are unusable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - can retry once the cause is resolved.
    ///
    /// Examples: a document changed between read and write
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: missing stat field, unknown asset key
    Validation,

    /// Internal error - a programming or UI error.
    ///
    /// Examples: writing a stat value outside its declared bounds
    Internal,

    /// Fatal error - rules cannot be used at all.
    ///
    /// Examples: a meter definition with `min >= max`
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug in the caller.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all rules-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Return a distinct `error_code` per variant
pub trait RulesError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
