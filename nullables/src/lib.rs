//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the validator (clock, token repository,
//! identity provider) has a stand-in here that:
//! - returns deterministic values
//! - can be controlled programmatically, including simulated network outages
//! - never touches the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod identity;
pub mod repository;

pub use clock::NullClock;
pub use identity::NullIdentityProvider;
pub use repository::NullRepository;
