//! Pluggable signature/hash suites.
//!
//! Every token header names the algorithm its chain was built with. The
//! validator resolves that name through an [`AlgorithmRegistry`] built once at
//! startup and passed around explicitly.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::CryptoError;
use custody_types::{Address, AddressType, Hash, PrivateKey, PublicKey, Signature};

/// Name of the built-in Ed25519 + Blake2b-256 suite.
pub const ED25519_BLAKE2B: &str = "ed25519-blake2b";

/// A hashing and signing suite.
pub trait Algorithm: Send + Sync {
    /// The identifier stored in token headers.
    fn name(&self) -> &str;

    /// Digest arbitrary bytes.
    fn hash(&self, data: &[u8]) -> Hash;

    /// Sign a hash-to-sign digest.
    fn sign(&self, hash: &Hash, key: &PrivateKey) -> Signature;

    /// Check `signature` over `hash` against the key of `signer`.
    ///
    /// `Ok(false)` is a signature that does not verify; `Err` means the
    /// address itself is unusable with this suite.
    fn verify_signature(
        &self,
        signature: &Signature,
        signer: &Address,
        hash: &Hash,
    ) -> Result<bool, CryptoError>;

    /// Build an address for a public key registered under `kind`.
    fn create_address(&self, public_key: PublicKey, kind: AddressType) -> Result<Address, CryptoError>;
}

/// Ed25519 signatures over Blake2b-256 digests.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Blake2b;

impl Algorithm for Ed25519Blake2b {
    fn name(&self) -> &str {
        ED25519_BLAKE2B
    }

    fn hash(&self, data: &[u8]) -> Hash {
        crate::hash_bytes(data)
    }

    fn sign(&self, hash: &Hash, key: &PrivateKey) -> Signature {
        crate::sign_message(hash.as_bytes(), key)
    }

    fn verify_signature(
        &self,
        signature: &Signature,
        signer: &Address,
        hash: &Hash,
    ) -> Result<bool, CryptoError> {
        if !crate::sign::is_valid_public_key(&signer.key) {
            return Err(CryptoError::MalformedKey(signer.to_string()));
        }
        Ok(crate::verify_signature(hash.as_bytes(), signature, &signer.key))
    }

    fn create_address(&self, public_key: PublicKey, kind: AddressType) -> Result<Address, CryptoError> {
        crate::derive_address(public_key, kind)
    }
}

/// The process-wide catalogue of algorithms, keyed by name.
#[derive(Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<String, Arc<dyn Algorithm>>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in suites.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Ed25519Blake2b));
        registry
    }

    pub fn register(&mut self, algorithm: Arc<dyn Algorithm>) {
        self.algorithms.insert(algorithm.name().to_string(), algorithm);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Algorithm>, CryptoError> {
        self.algorithms
            .get(name)
            .cloned()
            .ok_or_else(|| CryptoError::UnknownAlgorithm(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.algorithms.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.algorithms.keys()).finish()
    }
}
