//! Storage seams for the custody ledger.
//!
//! The validator only ever sees the [`Repository`] and [`IdentityProvider`]
//! traits. Backends (a directory of JSON files, a remote peer, in-memory
//! doubles for testing) implement them; [`CachedRepository`] puts the shared
//! first-level [`TokenCache`] in front of any of them.

pub mod cache;
pub mod error;
pub mod fs;
pub mod identity;
pub mod repository;

pub use cache::{CacheEntry, CachedRepository, TokenCache, Validity};
pub use error::StoreError;
pub use fs::FsRepository;
pub use identity::{Identity, IdentityProvider};
pub use repository::Repository;
