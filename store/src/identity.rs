//! Identity (KYC) lookup.

use custody_types::{Address, Location, Timestamp};
use serde::{Deserialize, Serialize};

/// A certified identity behind an address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub address: Address,
    pub location: Location,
    pub valid_from: Timestamp,
    /// Open-ended when `None`.
    #[serde(default)]
    pub valid_until: Option<Timestamp>,
}

impl Identity {
    pub fn is_valid_at(&self, at: Timestamp) -> bool {
        at >= self.valid_from && self.valid_until.map_or(true, |until| at < until)
    }
}

/// Resolves addresses to certified identities.
pub trait IdentityProvider: Send + Sync {
    /// `at` is the instant the identity is needed for; providers that keep
    /// history may use it to pick the right record.
    fn find_identity(&self, address: &Address, at: Timestamp) -> Result<Option<Identity>, crate::StoreError>;
}
