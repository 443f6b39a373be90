//! Nullable repository: thread-safe in-memory token storage.

use custody_store::{Repository, StoreError};
use custody_token::Token;
use custody_types::TokenId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// An in-memory repository whose network can be switched off.
#[derive(Debug, Default)]
pub struct NullRepository {
    tokens: Mutex<HashMap<TokenId, Token>>,
    unreachable: AtomicBool,
    lookups: AtomicUsize,
}

impl NullRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> Self {
        let repo = Self::new();
        for token in tokens {
            repo.insert(token.clone());
        }
        repo
    }

    pub fn insert(&self, token: Token) {
        self.tokens.lock().unwrap().insert(token.id(), token);
    }

    pub fn remove(&self, id: &TokenId) -> Option<Token> {
        self.tokens.lock().unwrap().remove(id)
    }

    /// Make every subsequent lookup fail with a network error.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of `find` calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Repository for NullRepository {
    fn find(&self, id: &TokenId) -> Result<Option<Token>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Network(format!("null repository unreachable looking up {id}")));
        }
        Ok(self.tokens.lock().unwrap().get(id).cloned())
    }

    fn put(&self, token: &Token) -> Result<(), StoreError> {
        self.insert(token.clone());
        Ok(())
    }
}
