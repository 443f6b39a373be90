//! The currency catalogue.
//!
//! Built explicitly at startup and handed to whoever needs it; there is no
//! process-global registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::decay::{DecayingCurrency, RetainFactor};
use crate::error::CurrencyError;
use crate::fixed::FixedCurrency;
use crate::schedule::CreationSchedule;
use crate::Currency;
use custody_types::{Target, Value};

pub const THANKS: &str = "Thanks";
pub const GRADIDO: &str = "Gradido";
pub const VOTE: &str = "Vote";

/// 0.9995 per day.
pub const THANKS_FACTOR: RetainFactor = RetainFactor::from_scaled(999_500_000_000_000_000);
/// 0.998102768652 per day (halves in one year).
pub const GRADIDO_FACTOR: RetainFactor = RetainFactor::from_scaled(998_102_768_652_000_000);

/// Largest amount a single decaying token may carry.
pub const MAX_TOKEN_AMOUNT: Value = Value::from_units(1_000);

fn standard_schedule() -> CreationSchedule {
    CreationSchedule {
        person_income: Value::UNIT,
        child_share_percent: 50,
        community_tax: Value::from_raw(10_000_000),
        sustainability: Value::from_raw(10_000_000),
        children_create: true,
    }
}

pub fn thanks() -> DecayingCurrency {
    DecayingCurrency::new(
        THANKS,
        THANKS_FACTOR,
        Value::MINIMAL,
        MAX_TOKEN_AMOUNT,
        Target::official(),
        standard_schedule(),
    )
}

pub fn gradido() -> DecayingCurrency {
    DecayingCurrency::new(
        GRADIDO,
        GRADIDO_FACTOR,
        Value::MINIMAL,
        MAX_TOKEN_AMOUNT,
        Target::official(),
        standard_schedule(),
    )
}

pub fn vote() -> FixedCurrency {
    FixedCurrency::new(VOTE, vec![Target::PERSON_INCOME])
}

/// Currencies keyed by name.
#[derive(Clone, Default)]
pub struct CurrencyRegistry {
    currencies: HashMap<String, Arc<dyn Currency>>,
}

impl CurrencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thanks, Gradido and Vote.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(thanks()));
        registry.register(Arc::new(gradido()));
        registry.register(Arc::new(vote()));
        registry
    }

    pub fn register(&mut self, currency: Arc<dyn Currency>) {
        self.currencies.insert(currency.name().to_string(), currency);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Currency>, CurrencyError> {
        self.currencies
            .get(name)
            .cloned()
            .ok_or_else(|| CurrencyError::UnknownCurrency(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.currencies.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for CurrencyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.currencies.keys()).finish()
    }
}
