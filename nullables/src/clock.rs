//! Nullable clock: deterministic time for testing.

use custody_types::{Clock, Timestamp};
use std::sync::atomic::{AtomicU64, Ordering};

/// A deterministic clock. Time only advances when you tell it to.
#[derive(Debug)]
pub struct NullClock {
    nanos: AtomicU64,
}

impl NullClock {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            nanos: AtomicU64::new(initial.as_nanos()),
        }
    }

    pub fn at_secs(secs: u64) -> Self {
        Self::new(Timestamp::from_secs(secs))
    }

    pub fn advance_secs(&self, secs: u64) {
        self.nanos.fetch_add(secs * 1_000_000_000, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: u64) {
        let next = self.now().plus_days(days);
        self.set(next);
    }

    pub fn set(&self, at: Timestamp) {
        self.nanos.store(at.as_nanos(), Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}
