//! Currency-specific errors.

use custody_types::Timestamp;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("valuation time {now} precedes creation time {created}")]
    ClockReversed { created: Timestamp, now: Timestamp },

    #[error("arithmetic overflow in value computation")]
    Overflow,

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),
}
