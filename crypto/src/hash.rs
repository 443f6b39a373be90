//! Blake2b-256, the digest behind hash-to-sign and hash-to-chain.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use custody_types::Hash;

type Blake2b256 = Blake2b<U32>;

pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    blake2b_256_multi(&[data])
}

/// Digest of the concatenation of `parts`, without building it.
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    parts
        .iter()
        .fold(Blake2b256::new(), |hasher, part| hasher.chain_update(part))
        .finalize()
        .into()
}

pub fn hash_bytes(data: &[u8]) -> Hash {
    Hash::new(blake2b_256(data))
}
