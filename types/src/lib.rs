//! Fundamental types for the custody ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! timestamps, values, hashes, keys, locations, targets, addresses, token identities
//! and validation failure records.

pub mod address;
pub mod amount;
pub mod error;
pub mod failure;
pub mod hash;
pub mod id;
pub mod keys;
pub mod location;
pub mod target;
pub mod time;

pub use address::{Address, AddressType};
pub use amount::{ParseValueError, Value};
pub use error::TypeError;
pub use failure::{Failure, FailureKind};
pub use hash::Hash;
pub use id::TokenId;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use location::Location;
pub use target::{Target, TargetType};
pub use time::{Clock, SystemClock, Timestamp};
