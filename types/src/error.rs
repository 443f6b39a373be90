//! Parse errors for the textual forms of core types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("invalid location segment: {0:?}")]
    InvalidLocation(String),

    #[error("invalid target: {0:?}")]
    InvalidTarget(String),

    #[error("invalid address type: {0:?}")]
    InvalidAddressType(String),
}
