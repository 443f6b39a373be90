//! Hash-to-sign / hash-to-chain memoization.
//!
//! ```text
//! header:  h2s = H(fields)                 h2c = H(h2s ++ sig)
//! tx[0]:   h2s = H(h2c(header) ++ fields)  h2c = H(h2s ++ sig)
//! tx[i]:   h2s = H(h2c(tx[i-1]) ++ fields) h2c = H(h2s ++ sig)
//! ```
//!
//! Both hashes are pure functions of field values, so a cell may be filled by
//! whichever thread gets there first.

use std::fmt;
use std::sync::OnceLock;

use custody_crypto::Algorithm;
use custody_types::{Hash, Signature};

use crate::error::TokenError;

/// A compute-once cache for a hash derived from a keyed input.
///
/// The key is the predecessor hash (zero for a header). A lookup under a
/// different key is computed but not cached.
#[derive(Clone, Default)]
pub struct HashCell(OnceLock<(Hash, Hash)>);

impl HashCell {
    pub fn get_or_compute(
        &self,
        key: Hash,
        compute: impl FnOnce() -> Result<Hash, TokenError>,
    ) -> Result<Hash, TokenError> {
        if let Some((cached_key, value)) = self.0.get() {
            if *cached_key == key {
                return Ok(*value);
            }
            return compute();
        }
        let value = compute()?;
        let _ = self.0.set((key, value));
        Ok(value)
    }

    pub fn is_filled(&self) -> bool {
        self.0.get().is_some()
    }
}

// Caches never take part in entity equality.
impl PartialEq for HashCell {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for HashCell {}

impl fmt::Debug for HashCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.get() {
            Some((_, value)) => write!(f, "HashCell({value:?})"),
            None => f.write_str("HashCell(empty)"),
        }
    }
}

/// `H(hash_to_sign ++ signature)`.
pub fn chain_hash(algorithm: &dyn Algorithm, to_sign: &Hash, signature: Option<&Signature>) -> Result<Hash, TokenError> {
    let signature = signature.ok_or(TokenError::MissingField("sig"))?;
    let mut bytes = Vec::with_capacity(32 + 64);
    bytes.extend_from_slice(to_sign.as_bytes());
    bytes.extend_from_slice(signature.as_bytes());
    Ok(algorithm.hash(&bytes))
}

pub(crate) fn check_algorithm(algorithm: &dyn Algorithm, expected: &str) -> Result<(), TokenError> {
    if algorithm.name() != expected {
        return Err(TokenError::AlgorithmMismatch {
            expected: expected.to_string(),
            actual: algorithm.name().to_string(),
        });
    }
    Ok(())
}
