//! Validation failure records.
//!
//! Failures are data, not errors: the validator collects them into a result
//! and decides separately whether to raise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a validation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    RequiredValueMissing,
    ValueMismatch,
    ValueOutOfRange,
    ValueNotInOptionSet,
    TimestampInFuture,
    SignatureInvalid,
    ReferenceNotFound,
    ReferenceCycleNotClosed,
    CurrencyMixed,
    UnexpectedException,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredValueMissing => "required-value-missing",
            Self::ValueMismatch => "value-mismatch",
            Self::ValueOutOfRange => "value-out-of-range",
            Self::ValueNotInOptionSet => "value-not-in-option-set",
            Self::TimestampInFuture => "timestamp-in-future",
            Self::SignatureInvalid => "signature-invalid",
            Self::ReferenceNotFound => "reference-not-found",
            Self::ReferenceCycleNotClosed => "reference-cycle-not-closed",
            Self::CurrencyMixed => "currency-mixed",
            Self::UnexpectedException => "unexpected-exception",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    /// Where the check failed, e.g. `header.amt` or `tx[2].sig`.
    pub field: String,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("{field} is required");
        Self::new(FailureKind::RequiredValueMissing, field, message)
    }

    pub fn mismatch(field: impl Into<String>, expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::new(
            FailureKind::ValueMismatch,
            field,
            format!("expected {expected}, found {actual}"),
        )
    }

    pub fn out_of_range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FailureKind::ValueOutOfRange, field, message)
    }

    pub fn not_in_set(field: impl Into<String>, value: impl fmt::Display) -> Self {
        Self::new(
            FailureKind::ValueNotInOptionSet,
            field,
            format!("{value} is not an allowed option"),
        )
    }

    /// Prefix the field path, e.g. when a failure is found on a referenced token.
    pub fn within(mut self, context: &str) -> Self {
        self.field = format!("{context}.{}", self.field);
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.field, self.message)
    }
}
