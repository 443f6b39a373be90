use proptest::prelude::*;

use custody_currency::{Currency, CurrencyRegistry, GRADIDO, THANKS};
use custody_types::{Timestamp, Value};

proptest! {
    /// Value must never increase as time passes.
    #[test]
    fn value_monotonic_in_time(
        raw in 1u128..1_000_000_000_000,
        created in 0u64..1u64 << 50,
        d1 in 0u64..1u64 << 50,
        d2 in 0u64..1u64 << 50,
        tx_count in 0usize..100,
    ) {
        let registry = CurrencyRegistry::standard();
        for name in [THANKS, GRADIDO] {
            let currency = registry.get(name).unwrap();
            let created = Timestamp::from_nanos(created);
            let t1 = Timestamp::from_nanos(created.as_nanos() + d1.min(d2));
            let t2 = Timestamp::from_nanos(created.as_nanos() + d1.max(d2));
            let amount = Value::from_raw(raw);
            let v1 = currency.value(amount, created, t1, tx_count).unwrap();
            let v2 = currency.value(amount, created, t2, tx_count).unwrap();
            prop_assert!(v1 >= v2, "{}: value rose from {} to {}", name, v1, v2);
        }
    }

    /// A fresh token is worth exactly its amount.
    #[test]
    fn value_at_creation_is_amount(raw in 0u128..1_000_000_000_000, created in 0u64..u64::MAX / 2) {
        let registry = CurrencyRegistry::standard();
        let currency = registry.get(THANKS).unwrap();
        let t = Timestamp::from_nanos(created);
        prop_assert_eq!(currency.value(Value::from_raw(raw), t, t, 0).unwrap(), Value::from_raw(raw));
    }

    /// More transactions never make a token worth more.
    #[test]
    fn value_monotonic_in_transactions(raw in 1u128..1_000_000_000, days in 0u64..5_000, a in 0usize..50, b in 0usize..50) {
        let registry = CurrencyRegistry::standard();
        let currency = registry.get(THANKS).unwrap();
        let created = Timestamp::from_secs(0);
        let now = created.plus_days(days);
        let fewer = currency.value(Value::from_raw(raw), created, now, a.min(b)).unwrap();
        let more = currency.value(Value::from_raw(raw), created, now, a.max(b)).unwrap();
        prop_assert!(fewer >= more);
    }
}
