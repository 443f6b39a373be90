//! First-level in-memory token cache.
//!
//! Shared by every validator thread. A verdict belongs to one chain version
//! (the token id plus its chain tail hash): appending a transaction starts a
//! new version. Per version, validity only ever moves from `Unknown` to a
//! verdict; a conflicting verdict is refused.

use custody_token::Token;
use custody_types::{Hash, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::StoreError;
use crate::repository::Repository;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

#[derive(Clone, Debug, Default)]
pub struct CacheEntry {
    pub token: Option<Token>,
    /// Verdicts keyed by chain tail hash.
    pub verdicts: HashMap<Hash, Validity>,
}

impl CacheEntry {
    pub fn validity(&self, version: &Hash) -> Validity {
        self.verdicts.get(version).copied().unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct TokenCache {
    entries: RwLock<HashMap<TokenId, CacheEntry>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &TokenId) -> Option<CacheEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(id).cloned()
    }

    pub fn token(&self, id: &TokenId) -> Option<Token> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(id).and_then(|entry| entry.token.clone())
    }

    pub fn validity(&self, id: &TokenId, version: &Hash) -> Validity {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(id).map(|entry| entry.validity(version)).unwrap_or_default()
    }

    /// Store a token body. Chains only grow, so a shorter body never
    /// replaces a longer one. Recorded verdicts are kept.
    pub fn insert(&self, token: Token) {
        let id = token.id();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(id).or_default();
        let stale = entry
            .token
            .as_ref()
            .map_or(true, |cached| cached.transactions().len() <= token.transactions().len());
        if stale {
            entry.token = Some(token);
        }
    }

    /// Record a verdict for one chain version. Repeating the same verdict is a no-op.
    pub fn record_validity(&self, id: &TokenId, version: &Hash, validity: Validity) -> Result<(), StoreError> {
        if validity == Validity::Unknown {
            return Ok(());
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let recorded = entries.entry(id.clone()).or_default().verdicts.entry(*version).or_default();
        match *recorded {
            Validity::Unknown => {
                *recorded = validity;
                Ok(())
            }
            previous if previous == validity => Ok(()),
            previous => {
                tracing::error!(token = %id, %version, recorded = ?previous, attempted = ?validity, "conflicting validity write");
                Err(StoreError::ConflictingValidity {
                    id: id.clone(),
                    version: *version,
                    recorded: previous,
                    attempted: validity,
                })
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A repository fronted by a shared [`TokenCache`].
///
/// Terminated bodies are final and served from the cache. A live body may
/// have grown in the backend since it was cached, so it is fetched again;
/// the cached copy stands in only when the backend no longer has it.
pub struct CachedRepository<R> {
    cache: Arc<TokenCache>,
    inner: R,
}

impl<R: Repository> CachedRepository<R> {
    pub fn new(inner: R, cache: Arc<TokenCache>) -> Self {
        Self { cache, inner }
    }

    pub fn cache(&self) -> &Arc<TokenCache> {
        &self.cache
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Repository> Repository for CachedRepository<R> {
    fn find(&self, id: &TokenId) -> Result<Option<Token>, StoreError> {
        let cached = self.cache.token(id);
        if let Some(token) = &cached {
            if !token.is_transferable() {
                tracing::trace!(token = %id, "cache hit");
                return Ok(cached);
            }
        }
        match self.inner.find(id)? {
            Some(token) => {
                self.cache.insert(token);
                Ok(self.cache.token(id))
            }
            None => Ok(cached),
        }
    }

    fn put(&self, token: &Token) -> Result<(), StoreError> {
        self.inner.put(token)?;
        self.cache.insert(token.clone());
        Ok(())
    }
}
