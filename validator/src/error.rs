use custody_store::StoreError;
use custody_types::TokenId;
use thiserror::Error;

use crate::result::ValidationResult;

#[derive(Debug, Error)]
pub enum ValidationError {
    /// The token failed one or more checks; raised per the failure mode.
    #[error("token is invalid: {0}")]
    Invalid(ValidationResult),

    /// A lookup failed transiently. Always raised; retry later.
    #[error("lookup failed while validating {token}: {source}")]
    Network {
        token: TokenId,
        #[source]
        source: StoreError,
    },

    /// Validation could not start at all.
    #[error("fatal: {0}")]
    Fatal(String),

    #[error("unexpected error: {source}")]
    Unexpected {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl ValidationError {
    /// Only network failures say nothing about the token itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ValidationError::Network { .. })
    }

    /// The collected failures, if this error carries them.
    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            ValidationError::Invalid(result) => Some(result),
            _ => None,
        }
    }

    pub(crate) fn unexpected(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ValidationError::Unexpected {
            source: Box::new(source),
        }
    }
}
