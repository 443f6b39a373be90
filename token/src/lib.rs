//! Token data model for the custody ledger.
//!
//! A [`Token`] is a signed [`Header`] followed by an append-only list of
//! [`Transaction`]s. Every entry is hashed over its fields in the fixed order
//! declared in [`fields`], chained onto its predecessor (see [`chain`]) and
//! signed by the owner it hands the token away from.
//!
//! [`fork`] and [`merge`] build the closed reference cycles that split or
//! combine tokens.

pub mod chain;
pub mod error;
pub mod fields;
pub mod fork;
pub mod header;
pub mod merge;
pub mod reference;
pub mod token;
pub mod transaction;

pub use chain::{chain_hash, HashCell};
pub use error::TokenError;
pub use fields::{CanonicalWriter, FieldDef, HeaderField, TransactionField};
pub use fork::{fork, Forked, MIN_FORK_TOKENS};
pub use header::{Header, HeaderBuilder, PROTOCOL_VERSION};
pub use merge::{merge, Merged, MIN_MERGE_TOKENS};
pub use reference::{Reference, ReferenceRole};
pub use token::Token;
pub use transaction::{Transaction, TransactionBuilder};
