//! Non-decaying currencies whose tokens each carry exactly one unit.

use crate::error::CurrencyError;
use crate::Currency;
use custody_types::{AddressType, Target, Timestamp, Value};

/// A currency that never loses value, e.g. one vote per token.
#[derive(Clone, Debug)]
pub struct FixedCurrency {
    name: String,
    targets: Vec<Target>,
}

impl FixedCurrency {
    pub fn new(name: impl Into<String>, targets: Vec<Target>) -> Self {
        Self {
            name: name.into(),
            targets,
        }
    }
}

impl Currency for FixedCurrency {
    fn name(&self) -> &str {
        &self.name
    }

    /// The amount, unchanged by age or transfers. Still rejects a reversed clock.
    fn value(
        &self,
        amount: Value,
        created: Timestamp,
        now: Timestamp,
        _tx_count: usize,
    ) -> Result<Value, CurrencyError> {
        if now < created {
            return Err(CurrencyError::ClockReversed { created, now });
        }
        Ok(amount)
    }

    fn min_amount(&self) -> Value {
        Value::UNIT
    }

    fn max_amount(&self) -> Value {
        Value::UNIT
    }

    fn targets(&self) -> &[Target] {
        &self.targets
    }

    fn creation_amount(&self, _target: &Target, creator: &AddressType) -> Option<Value> {
        (*creator == AddressType::NaturalPersonAdult).then_some(Value::UNIT)
    }
}
