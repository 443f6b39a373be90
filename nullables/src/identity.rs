//! Nullable identity provider.

use custody_store::{Identity, IdentityProvider, StoreError};
use custody_types::{Address, Location, Timestamp};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Identities registered up front; lookups never leave the process.
#[derive(Debug, Default)]
pub struct NullIdentityProvider {
    identities: Mutex<HashMap<Address, Identity>>,
    unreachable: AtomicBool,
}

impl NullIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, identity: Identity) {
        self.identities
            .lock()
            .unwrap()
            .insert(identity.address.clone(), identity);
    }

    /// Register `address` as certified at `location` from `valid_from` on.
    pub fn certify(&self, address: &Address, location: Location, valid_from: Timestamp) {
        self.register(Identity {
            address: address.clone(),
            location,
            valid_from,
            valid_until: None,
        });
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }
}

impl IdentityProvider for NullIdentityProvider {
    fn find_identity(&self, address: &Address, _at: Timestamp) -> Result<Option<Identity>, StoreError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(StoreError::Network(format!("identity service unreachable for {address}")));
        }
        Ok(self.identities.lock().unwrap().get(address).cloned())
    }
}
