//! Token lookup by identity.

use custody_token::Token;
use custody_types::TokenId;
use std::sync::Arc;

use crate::error::StoreError;

/// Where referenced tokens are fetched from.
///
/// `find` may block on disk or network I/O and may fail with
/// [`StoreError::Network`]; a miss is `Ok(None)`.
pub trait Repository: Send + Sync {
    fn find(&self, id: &TokenId) -> Result<Option<Token>, StoreError>;

    /// Persist a token under its identity. Read-only backends refuse.
    fn put(&self, _token: &Token) -> Result<(), StoreError> {
        Err(StoreError::ReadOnly)
    }
}

impl<R: Repository + ?Sized> Repository for Arc<R> {
    fn find(&self, id: &TokenId) -> Result<Option<Token>, StoreError> {
        (**self).find(id)
    }

    fn put(&self, token: &Token) -> Result<(), StoreError> {
        (**self).put(token)
    }
}
