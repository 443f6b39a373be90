//! The top-level validator.

use std::sync::Arc;

use custody_crypto::{Algorithm, AlgorithmRegistry};
use custody_currency::{Currency, CurrencyRegistry};
use custody_store::{Identity, IdentityProvider, Repository, StoreError, TokenCache, Validity};
use custody_token::Token;
use custody_types::{Address, Clock, Failure, FailureKind, SystemClock, Timestamp, TokenId};
use rayon::prelude::*;

use crate::config::{ValidatorConfig, DEFAULT_MAX_CYCLE_LENGTH};
use crate::error::ValidationError;
use crate::mode::ValidationMode;
use crate::result::{Collector, ValidationResult};

/// A failure that may clear without the token changing: its clock catches
/// up, or a referenced token or identity shows up.
fn is_transient(kind: FailureKind) -> bool {
    matches!(kind, FailureKind::TimestampInFuture | FailureKind::ReferenceNotFound)
}

/// Validates tokens against the catalogues and collaborators it was built with.
///
/// Holds no per-token state; one instance may validate many tokens
/// concurrently.
pub struct Validator {
    algorithms: AlgorithmRegistry,
    currencies: CurrencyRegistry,
    repository: Option<Arc<dyn Repository>>,
    identities: Option<Arc<dyn IdentityProvider>>,
    verdicts: Option<Arc<TokenCache>>,
    clock: Arc<dyn Clock>,
    max_cycle_length: usize,
    max_clock_skew_millis: u64,
}

impl Validator {
    pub fn new(algorithms: AlgorithmRegistry, currencies: CurrencyRegistry) -> Self {
        Self {
            algorithms,
            currencies,
            repository: None,
            identities: None,
            verdicts: None,
            clock: Arc::new(SystemClock),
            max_cycle_length: DEFAULT_MAX_CYCLE_LENGTH,
            max_clock_skew_millis: 0,
        }
    }

    /// Built-in algorithms and currencies, no collaborators.
    pub fn standard() -> Self {
        Self::new(AlgorithmRegistry::standard(), CurrencyRegistry::standard())
    }

    pub fn with_repository(mut self, repository: Arc<dyn Repository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_identity_provider(mut self, identities: Arc<dyn IdentityProvider>) -> Self {
        self.identities = Some(identities);
        self
    }

    /// Record verdicts of complete, fully verified validations in `cache`.
    pub fn with_verdict_cache(mut self, cache: Arc<TokenCache>) -> Self {
        self.verdicts = Some(cache);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: &ValidatorConfig) -> Self {
        self.max_cycle_length = config.max_cycle_length;
        self.max_clock_skew_millis = config.max_clock_skew_millis;
        self
    }

    pub fn algorithms(&self) -> &AlgorithmRegistry {
        &self.algorithms
    }

    pub fn currencies(&self) -> &CurrencyRegistry {
        &self.currencies
    }

    pub(crate) fn max_cycle_length(&self) -> usize {
        self.max_cycle_length
    }

    /// Validate one token.
    ///
    /// Returns the collected failures, or raises them per the mode's failure
    /// mode. Unreachable lookups raise [`ValidationError::Network`] unless the
    /// mode is offline.
    pub fn validate(&self, token: &Token, mode: &ValidationMode) -> Result<ValidationResult, ValidationError> {
        let id = token.id();
        let span = tracing::debug_span!("validate", token = %id, %mode);
        let _entered = span.enter();

        let result = self.run_checks(token, mode);
        match &result {
            Ok(result) => tracing::debug!(valid = result.is_valid(), failures = result.failures.len(), "validated"),
            Err(e) if e.is_retryable() => tracing::warn!(error = %e, "validation interrupted"),
            Err(e) => tracing::debug!(error = %e, "validation raised"),
        }
        self.record_verdict(token, mode, &result)?;
        result
    }

    /// Parse and validate a token's JSON form. Unreadable input is fatal.
    pub fn validate_json(&self, json: &str, mode: &ValidationMode) -> Result<ValidationResult, ValidationError> {
        let token = Token::from_json(json).map_err(|e| ValidationError::Fatal(format!("unreadable token: {e}")))?;
        self.validate(&token, mode)
    }

    /// Validate independent tokens in parallel, results in input order.
    pub fn validate_batch(
        &self,
        tokens: &[Token],
        mode: &ValidationMode,
    ) -> Vec<Result<ValidationResult, ValidationError>> {
        tokens.par_iter().map(|token| self.validate(token, mode)).collect()
    }

    fn run_checks(&self, token: &Token, mode: &ValidationMode) -> Result<ValidationResult, ValidationError> {
        let header = token.header();
        let mut out = Collector::new(mode.failure_mode, token.id());

        let algorithm = match self.algorithms.get(header.algorithm()) {
            Ok(algorithm) => algorithm,
            Err(_) => {
                // Nothing can be hashed without the algorithm.
                out.push(Failure::not_in_set("header.alg", header.algorithm()))?;
                return out.finish();
            }
        };
        let currency = match self.currencies.get(header.currency()) {
            Ok(currency) => Some(currency),
            Err(_) => {
                out.push(Failure::not_in_set("header.cur", header.currency()))?;
                None
            }
        };

        let check = TokenCheck {
            validator: self,
            mode,
            token,
            algorithm: algorithm.as_ref(),
            currency: currency.as_deref(),
            now: self.clock.now(),
        };
        check.header(&mut out)?;
        check.origin(&mut out)?;
        check.transactions(&mut out)?;
        check.destination(&mut out)?;
        out.finish()
    }

    /// Remember a settled verdict for this chain version. Failures that time
    /// or a later lookup can clear are not settled.
    fn record_verdict(
        &self,
        token: &Token,
        mode: &ValidationMode,
        result: &Result<ValidationResult, ValidationError>,
    ) -> Result<(), ValidationError> {
        let Some(cache) = &self.verdicts else {
            return Ok(());
        };
        if !mode.is_complete() {
            return Ok(());
        }
        let result = match result {
            Ok(r) | Err(ValidationError::Invalid(r)) => r,
            _ => return Ok(()),
        };
        if !result.unverified.is_empty() || result.failures.iter().any(|f| is_transient(f.kind)) {
            return Ok(());
        }
        let Ok(algorithm) = self.algorithms.get(token.header().algorithm()) else {
            return Ok(());
        };
        let Ok(version) = token.chain_tail_hash(algorithm.as_ref()) else {
            return Ok(());
        };
        let verdict = if result.is_valid() { Validity::Valid } else { Validity::Invalid };
        cache
            .record_validity(&result.token, &version, verdict)
            .map_err(ValidationError::unexpected)
    }

    /// Resolve a referenced token. Misses and skipped lookups are `None`,
    /// with the failure or the skip already recorded.
    pub(crate) fn find_token(
        &self,
        id: &TokenId,
        mode: &ValidationMode,
        out: &mut Collector,
        field: &str,
    ) -> Result<Option<Token>, ValidationError> {
        let Some(repository) = &self.repository else {
            out.push(Failure::new(
                FailureKind::RequiredValueMissing,
                field,
                format!("no repository to resolve {id}"),
            ))?;
            return Ok(None);
        };
        match repository.find(id) {
            Ok(Some(token)) => Ok(Some(token)),
            Ok(None) => {
                out.push(Failure::new(FailureKind::ReferenceNotFound, field, format!("{id} not found")))?;
                Ok(None)
            }
            Err(e) => {
                self.lookup_failed(e, mode, out, format!("{field}: token {id}"))?;
                Ok(None)
            }
        }
    }

    /// Resolve the identity behind `address`, same conventions as [`Self::find_token`].
    pub(crate) fn find_identity(
        &self,
        address: &Address,
        at: Timestamp,
        mode: &ValidationMode,
        out: &mut Collector,
        field: &str,
    ) -> Result<Option<Identity>, ValidationError> {
        let Some(identities) = &self.identities else {
            out.push(Failure::new(
                FailureKind::RequiredValueMissing,
                field,
                format!("no identity provider to certify {address}"),
            ))?;
            return Ok(None);
        };
        match identities.find_identity(address, at) {
            Ok(Some(identity)) => Ok(Some(identity)),
            Ok(None) => {
                out.push(Failure::new(
                    FailureKind::ReferenceNotFound,
                    field,
                    format!("no identity for {address}"),
                ))?;
                Ok(None)
            }
            Err(e) => {
                self.lookup_failed(e, mode, out, format!("{field}: identity {address}"))?;
                Ok(None)
            }
        }
    }

    fn lookup_failed(
        &self,
        error: StoreError,
        mode: &ValidationMode,
        out: &mut Collector,
        what: String,
    ) -> Result<(), ValidationError> {
        if !error.is_retryable() {
            return Err(ValidationError::unexpected(error));
        }
        if mode.offline {
            tracing::warn!(token = %out.token(), error = %error, "skipping unreachable check: {what}");
            out.unverified(what);
            return Ok(());
        }
        Err(ValidationError::Network {
            token: out.token().clone(),
            source: error,
        })
    }
}

/// One token's validation pass: the token, its resolved algorithm and
/// currency, and the instant it is judged at.
pub(crate) struct TokenCheck<'a> {
    pub(crate) validator: &'a Validator,
    pub(crate) mode: &'a ValidationMode,
    pub(crate) token: &'a Token,
    pub(crate) algorithm: &'a dyn Algorithm,
    pub(crate) currency: Option<&'a dyn Currency>,
    pub(crate) now: Timestamp,
}

impl TokenCheck<'_> {
    /// Latest timestamp not considered in the future.
    pub(crate) fn horizon(&self) -> Timestamp {
        self.now.plus_millis(self.validator.max_clock_skew_millis)
    }
}
