use custody_types::{Hash, TokenId};
use thiserror::Error;

use crate::cache::Validity;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A remote lookup failed transiently; the same call may succeed later.
    #[error("network error: {0}")]
    Network(String),

    #[error("token {id} at chain {version} already recorded as {recorded:?}, refusing {attempted:?}")]
    ConflictingValidity {
        id: TokenId,
        version: Hash,
        recorded: Validity,
        attempted: Validity,
    },

    #[error("repository is read-only")]
    ReadOnly,

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Network(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
