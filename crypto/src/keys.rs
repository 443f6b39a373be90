//! Ed25519 key material.

use crate::error::CryptoError;
use custody_types::{KeyPair, PrivateKey, PublicKey};
use ed25519_dalek::SigningKey;

/// A fresh key pair seeded from the operating system.
pub fn generate_keypair() -> Result<KeyPair, CryptoError> {
    let mut seed = [0u8; 32];
    getrandom::getrandom(&mut seed).map_err(|e| CryptoError::Randomness(e.to_string()))?;
    Ok(keypair_from_seed(&seed))
}

pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

/// Deterministic key pair; the seed is the private key.
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    let private = PrivateKey(*seed);
    KeyPair {
        public: public_from_private(&private),
        private,
    }
}
