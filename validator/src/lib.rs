//! Token validation for the custody ledger.
//!
//! [`Validator::validate`] runs, in order:
//! 1. header checks: version, timestamp, currency rules, header signature;
//! 2. creation legitimacy: a certified creator, or a closed fork/merge cycle;
//! 3. the transaction chain: ordering, chained signatures, terminators and
//!    the purpose of the first transfer;
//! 4. arrival of tax and sustainability tokens at their destination.
//!
//! Which of these run is chosen by a [`ValidationMode`]; whether failures are
//! returned or raised by its [`FailureMode`].

mod chain;
pub mod config;
mod cycle;
pub mod error;
mod header;
pub mod mode;
pub mod result;
mod signature;
pub mod validator;

pub use chain::MIN_TRANSFERS_TO_DESTINATION;
pub use config::{ValidatorConfig, DEFAULT_MAX_CYCLE_LENGTH};
pub use error::ValidationError;
pub use mode::{FailureMode, ValidationMode};
pub use result::ValidationResult;
pub use validator::Validator;
