//! Demurrage: value that shrinks by a fixed factor every elapsed day.
//!
//! `value = max(0, floor(amount × factor^days) − tx_count × 0.00000001)`
//!
//! The factor is a 10^18 fixed-point integer and is raised to the day count by
//! square-and-multiply with truncation at every step. No floating point is
//! involved, so every node computes the same value bit for bit.

use crate::error::CurrencyError;
use crate::schedule::CreationSchedule;
use crate::Currency;
use custody_types::{AddressType, Target, Timestamp, Value};

/// Fixed-point scale of a daily retaining factor.
pub const FACTOR_SCALE: u128 = 1_000_000_000_000_000_000;

/// Fraction of value kept per elapsed day, scaled by [`FACTOR_SCALE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetainFactor(u128);

impl RetainFactor {
    /// `scaled` must not exceed [`FACTOR_SCALE`].
    pub const fn from_scaled(scaled: u128) -> Self {
        assert!(scaled <= FACTOR_SCALE, "retaining factor above 1");
        Self(scaled)
    }

    pub fn scaled(&self) -> u128 {
        self.0
    }

    /// `self ^ days`, truncated to the fixed-point scale.
    pub fn pow(&self, mut days: u64) -> u128 {
        let mut result = FACTOR_SCALE;
        let mut base = self.0;
        while days > 0 {
            if result == 0 {
                break;
            }
            if days & 1 == 1 {
                result = result * base / FACTOR_SCALE;
            }
            base = base * base / FACTOR_SCALE;
            days >>= 1;
        }
        result
    }
}

/// Apply `days` of decay to `amount`, then charge one minimal unit per transaction.
pub fn decay(amount: Value, factor: RetainFactor, days: u64, tx_count: usize) -> Result<Value, CurrencyError> {
    let kept = amount
        .raw()
        .checked_mul(factor.pow(days))
        .ok_or(CurrencyError::Overflow)?
        / FACTOR_SCALE;
    let fees = Value::MINIMAL.raw().saturating_mul(tx_count as u128);
    Ok(Value::from_raw(kept.saturating_sub(fees)))
}

/// A currency whose tokens lose value every day.
#[derive(Clone, Debug)]
pub struct DecayingCurrency {
    name: String,
    factor: RetainFactor,
    min: Value,
    max: Value,
    targets: Vec<Target>,
    schedule: CreationSchedule,
}

impl DecayingCurrency {
    pub fn new(
        name: impl Into<String>,
        factor: RetainFactor,
        min: Value,
        max: Value,
        targets: Vec<Target>,
        schedule: CreationSchedule,
    ) -> Self {
        Self {
            name: name.into(),
            factor,
            min,
            max,
            targets,
            schedule,
        }
    }

    pub fn factor(&self) -> RetainFactor {
        self.factor
    }
}

impl Currency for DecayingCurrency {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(
        &self,
        amount: Value,
        created: Timestamp,
        now: Timestamp,
        tx_count: usize,
    ) -> Result<Value, CurrencyError> {
        let days = created
            .whole_days_until(now)
            .ok_or(CurrencyError::ClockReversed { created, now })?;
        decay(amount, self.factor, days, tx_count)
    }

    fn min_amount(&self) -> Value {
        self.min
    }

    fn max_amount(&self) -> Value {
        self.max
    }

    fn targets(&self) -> &[Target] {
        &self.targets
    }

    fn creation_amount(&self, target: &Target, creator: &AddressType) -> Option<Value> {
        self.schedule.amount_for(target, creator)
    }
}
