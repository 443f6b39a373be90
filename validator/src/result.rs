//! Validation outcome and the failure collector behind it.

use custody_types::{Failure, FailureKind, TokenId};
use serde::Serialize;
use std::fmt;

use crate::error::ValidationError;
use crate::mode::FailureMode;

/// Failures found on one token. Valid iff `failures` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub token: TokenId,
    pub failures: Vec<Failure>,
    /// Checks skipped because a lookup was unreachable in offline mode.
    pub unverified: Vec<String>,
}

impl ValidationResult {
    pub fn new(token: TokenId) -> Self {
        Self {
            token,
            failures: Vec::new(),
            unverified: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Valid and nothing was skipped.
    pub fn is_fully_verified(&self) -> bool {
        self.is_valid() && self.unverified.is_empty()
    }

    pub fn has(&self, kind: FailureKind) -> bool {
        self.failures.iter().any(|f| f.kind == kind)
    }

    pub fn kinds(&self) -> Vec<FailureKind> {
        self.failures.iter().map(|f| f.kind).collect()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return write!(f, "{} valid", self.token);
        }
        write!(f, "{}: {} failure(s)", self.token, self.failures.len())?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}

/// Accumulates failures and applies the failure mode.
///
/// `push` returns `Err` under fail-on-first, so checks written with `?`
/// stop at the first failure without any mode-specific code.
#[derive(Debug)]
pub(crate) struct Collector {
    failure_mode: FailureMode,
    result: ValidationResult,
}

impl Collector {
    pub(crate) fn new(failure_mode: FailureMode, token: TokenId) -> Self {
        Self {
            failure_mode,
            result: ValidationResult::new(token),
        }
    }

    pub(crate) fn token(&self) -> &TokenId {
        &self.result.token
    }

    pub(crate) fn push(&mut self, failure: Failure) -> Result<(), ValidationError> {
        tracing::debug!(token = %self.result.token, kind = ?failure.kind, field = %failure.field, "check failed: {}", failure.message);
        self.result.failures.push(failure);
        if self.failure_mode == FailureMode::FailOnFirst {
            return Err(ValidationError::Invalid(self.result.clone()));
        }
        Ok(())
    }

    pub(crate) fn extend(&mut self, failures: impl IntoIterator<Item = Failure>) -> Result<(), ValidationError> {
        for failure in failures {
            self.push(failure)?;
        }
        Ok(())
    }

    pub(crate) fn unverified(&mut self, what: String) {
        self.result.unverified.push(what);
    }

    pub(crate) fn finish(self) -> Result<ValidationResult, ValidationError> {
        if self.failure_mode == FailureMode::FailAtEnd && !self.result.is_valid() {
            return Err(ValidationError::Invalid(self.result));
        }
        Ok(self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_types::{Location, Timestamp};

    fn id() -> TokenId {
        TokenId {
            timestamp: Timestamp::from_secs(1),
            location: Location::world(),
            version: 1,
            algorithm: "ed25519-blake2b".into(),
            currency: "Thanks".into(),
        }
    }

    #[test]
    fn collect_all_never_raises() {
        let mut out = Collector::new(FailureMode::CollectAll, id());
        out.push(Failure::missing("header.sig")).unwrap();
        out.push(Failure::missing("tx[0].sig")).unwrap();
        let result = out.finish().unwrap();
        assert_eq!(result.failures.len(), 2);
        assert!(!result.is_valid());
    }

    #[test]
    fn fail_on_first_raises_immediately() {
        let mut out = Collector::new(FailureMode::FailOnFirst, id());
        let err = out.push(Failure::missing("header.sig")).unwrap_err();
        assert_eq!(err.result().unwrap().failures.len(), 1);
    }

    #[test]
    fn fail_at_end_raises_with_everything() {
        let mut out = Collector::new(FailureMode::FailAtEnd, id());
        out.push(Failure::missing("a")).unwrap();
        out.push(Failure::missing("b")).unwrap();
        let err = out.finish().unwrap_err();
        assert_eq!(err.result().unwrap().failures.len(), 2);
        let ok = Collector::new(FailureMode::FailAtEnd, id()).finish().unwrap();
        assert!(ok.is_valid());
    }
}
