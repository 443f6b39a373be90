//! Ed25519 signing over chain digests.

use custody_types::{PrivateKey, PublicKey, Signature};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

pub fn sign_message(message: &[u8], private_key: &PrivateKey) -> Signature {
    Signature(SigningKey::from_bytes(&private_key.0).sign(message).to_bytes())
}

/// Strict verification: non-canonical signatures and small-order keys fail.
pub fn verify_signature(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
    VerifyingKey::from_bytes(&public_key.0)
        .map(|key| {
            key.verify_strict(message, &ed25519_dalek::Signature::from_bytes(&signature.0))
                .is_ok()
        })
        .unwrap_or(false)
}

/// Whether the bytes decode to a curve point usable as a verifying key.
pub fn is_valid_public_key(public_key: &PublicKey) -> bool {
    VerifyingKey::from_bytes(&public_key.0).is_ok()
}
