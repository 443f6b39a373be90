#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use custody_currency::{Currency, CurrencyRegistry};
use custody_types::{Timestamp, Value};

#[derive(Debug, Arbitrary)]
struct Input {
    currency: u8,
    amount: u128,
    created: u64,
    elapsed: u64,
    tx_count: u16,
}

// Decay must never panic and never grow a token's value.
fuzz_target!(|input: Input| {
    let registry = CurrencyRegistry::standard();
    let names: Vec<&str> = registry.names().collect();
    let name = names[input.currency as usize % names.len()];
    let Ok(currency) = registry.get(name) else {
        return;
    };

    let amount = Value::from_raw(input.amount);
    let created = Timestamp::from_nanos(input.created);
    let now = Timestamp::from_nanos(input.created.saturating_add(input.elapsed));
    if let Ok(value) = currency.value(amount, created, now, input.tx_count as usize) {
        assert!(value <= amount, "{name}: {value} grew from {amount}");
    }
});
