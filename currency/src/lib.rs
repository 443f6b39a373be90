//! Currency policies.
//!
//! A currency decides three things about the tokens minted in it:
//! - how their value decays with age and transfers ([`Currency::value`]),
//! - which amounts and targets a header may carry,
//! - the exact amount a freshly created token must have.

pub mod decay;
pub mod error;
pub mod fixed;
pub mod registry;
pub mod schedule;

pub use decay::{decay, DecayingCurrency, RetainFactor, FACTOR_SCALE};
pub use error::CurrencyError;
pub use fixed::FixedCurrency;
pub use registry::{CurrencyRegistry, GRADIDO, THANKS, VOTE};
pub use schedule::CreationSchedule;

use custody_types::{AddressType, Failure, Target, Timestamp, Value};

/// A named value policy.
pub trait Currency: Send + Sync {
    fn name(&self) -> &str;

    /// Current value of `amount` created at `created`, seen at `now`, after
    /// `tx_count` recorded transactions.
    fn value(
        &self,
        amount: Value,
        created: Timestamp,
        now: Timestamp,
        tx_count: usize,
    ) -> Result<Value, CurrencyError>;

    fn min_amount(&self) -> Value;

    fn max_amount(&self) -> Value;

    /// Targets a header in this currency may name.
    fn targets(&self) -> &[Target];

    /// Prescribed amount for a fresh token, or `None` if `creator` may not
    /// create for `target`.
    fn creation_amount(&self, target: &Target, creator: &AddressType) -> Option<Value>;

    /// Check a header's amount and target.
    ///
    /// `derived` is true for tokens produced by a fork or merge: those skip the
    /// exact creation-amount check since conservation is verified on the cycle.
    fn validate(&self, amount: Value, target: &Target, creator: &AddressType, derived: bool) -> Vec<Failure> {
        let mut failures = Vec::new();
        if amount < self.min_amount() || amount > self.max_amount() {
            failures.push(Failure::out_of_range(
                "header.amt",
                format!(
                    "{amount} outside [{}, {}] for {}",
                    self.min_amount(),
                    self.max_amount(),
                    self.name()
                ),
            ));
        }
        if !self.targets().contains(target) {
            failures.push(Failure::not_in_set("header.tgt", target));
            return failures;
        }
        if !derived {
            match self.creation_amount(target, creator) {
                None => failures.push(Failure::not_in_set("header.rcp.t", creator)),
                Some(expected) if expected != amount => {
                    tracing::debug!(currency = self.name(), %expected, %amount, "creation amount mismatch");
                    failures.push(Failure::mismatch("header.amt", expected, amount));
                }
                Some(_) => {}
            }
        }
        failures
    }
}
