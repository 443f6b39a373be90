//! Address derivation and textual encoding.
//!
//! Text format: `<address-type>_` + base32(public_key, 52 chars) + base32(checksum, 8 chars),
//! e.g. `person-adult_3f...` or `community-rep@2_9k...`.
//!
//! Checksum: first 5 bytes of Blake2b-256(type code, level, public_key), so a key
//! re-tagged with another role no longer validates.
//! Base32 alphabet: `13456789abcdefghijkmnopqrstuwxyz` (avoids ambiguous chars).

use crate::error::CryptoError;
use crate::sign::is_valid_public_key;
use custody_types::{Address, AddressType, PublicKey};

/// Base32 alphabet (32 chars, avoids visually ambiguous 0/O, 2/Z, l/I, v).
const BASE32_ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Expected length of the encoded key part: 52 pubkey + 8 checksum.
const ENCODED_LEN: usize = 60;
/// Number of base32 characters for the public key (256 bits → ceil(256/5) = 52).
const PUBKEY_CHARS: usize = 52;

/// Encode a byte slice as base32 using the address alphabet.
fn encode_base32(bytes: &[u8]) -> String {
    let total_bits = bytes.len() * 8;
    let num_chars = total_bits.div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    // Remaining bits (padded with zeros on the right).
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// Decode a base32 string into a fixed-size byte array. Returns `None` on
/// invalid characters or wrong length. Zero-allocation.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos < N {
                result[pos] = (buffer >> bits_in_buffer) as u8;
                pos += 1;
            }
        }
    }

    if pos < N {
        return None;
    }
    Some(result)
}

/// Create an address for `public_key` registered under `kind`.
///
/// Fails if the key bytes are not a valid Ed25519 point.
pub fn derive_address(public_key: PublicKey, kind: AddressType) -> Result<Address, CryptoError> {
    let address = Address::new(kind, public_key);
    if !is_valid_public_key(&address.key) {
        return Err(CryptoError::MalformedKey(address.to_string()));
    }
    Ok(address)
}

fn checksum(address: &Address) -> [u8; 5] {
    let hash = crate::blake2b_256_multi(&[&address.kind.to_bytes(), address.key.as_bytes()]);
    let mut out = [0u8; 5];
    out.copy_from_slice(&hash[..5]);
    out
}

/// Render an address in its checksummed text form.
pub fn encode_address(address: &Address) -> String {
    format!(
        "{}_{}{}",
        address.kind,
        encode_base32(address.key.as_bytes()),
        encode_base32(&checksum(address))
    )
}

/// Parse the text form produced by [`encode_address`].
///
/// Returns `None` if the address is malformed or has an invalid checksum.
pub fn decode_address(text: &str) -> Option<Address> {
    let (kind, encoded) = text.rsplit_once('_')?;
    let kind: AddressType = kind.parse().ok()?;
    if encoded.len() != ENCODED_LEN {
        return None;
    }

    let pubkey_bytes: [u8; 32] = decode_base32_fixed(&encoded[..PUBKEY_CHARS])?;
    let checksum_bytes: [u8; 5] = decode_base32_fixed(&encoded[PUBKEY_CHARS..])?;

    let address = Address::new(kind, PublicKey(pubkey_bytes));
    if checksum_bytes != checksum(&address) {
        return None;
    }
    Some(address)
}

/// Validate that an address string is well-formed and its checksum is correct.
pub fn validate_address(text: &str) -> bool {
    decode_address(text).is_some()
}
