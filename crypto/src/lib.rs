//! Cryptographic primitives for the custody ledger.
//!
//! - **Ed25519** for signing and signature verification
//! - **Blake2b** for the hash chain
//! - Typed address derivation and checksummed base32 text form
//! - The [`Algorithm`] trait a token header names, plus its registry

pub mod address;
pub mod algorithm;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{decode_address, derive_address, encode_address, validate_address};
pub use algorithm::{Algorithm, AlgorithmRegistry, Ed25519Blake2b, ED25519_BLAKE2B};
pub use error::CryptoError;
pub use hash::{blake2b_256, blake2b_256_multi, hash_bytes};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use sign::{is_valid_public_key, sign_message, verify_signature};

/// A compressed point that does not decompress: y = 2 gives no square x².
#[cfg(test)]
pub(crate) const OFF_CURVE_KEY: custody_types::PublicKey = {
    let mut bytes = [0u8; 32];
    bytes[0] = 2;
    custody_types::PublicKey(bytes)
};
