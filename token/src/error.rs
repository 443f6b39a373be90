//! Token construction errors.

use custody_crypto::CryptoError;
use custody_currency::CurrencyError;
use custody_types::{Timestamp, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("mandatory field {0} is missing")]
    MissingField(&'static str),

    #[error("field {key} is {len} bytes, longer than a u32 length prefix allows")]
    FieldTooLong { key: String, len: usize },

    #[error("token is terminated by a fork or merge and cannot be transferred")]
    NotTransferable,

    #[error("key does not belong to the current owner")]
    NotOwner,

    #[error("timestamp {at} is not after the previous entry at {previous}")]
    TimestampNotAfter { at: Timestamp, previous: Timestamp },

    #[error("a {kind} needs at least {min} tokens, got {got}")]
    CycleTooShort { kind: &'static str, min: usize, got: usize },

    #[error("requested {requested} exceeds available value {available}")]
    InsufficientValue { requested: Value, available: Value },

    #[error("entity uses algorithm {expected}, hashed with {actual}")]
    AlgorithmMismatch { expected: String, actual: String },

    #[error("tokens in one merge must share currency, algorithm and version")]
    CurrencyMixed,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Currency(#[from] CurrencyError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TokenError {
    fn from(e: serde_json::Error) -> Self {
        TokenError::Serialization(e.to_string())
    }
}
