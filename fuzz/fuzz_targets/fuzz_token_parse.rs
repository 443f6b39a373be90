#![no_main]

use libfuzzer_sys::fuzz_target;

use custody_crypto::Ed25519Blake2b;
use custody_token::Token;
use custody_validator::{ValidationMode, Validator};

// Arbitrary text as token JSON: parsing, chain hashing and a minimal
// validation must never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(token) = Token::from_json(json) else {
        return;
    };

    let _ = token.chain_hashes(&Ed25519Blake2b);
    let _ = token.to_json_pretty();

    let validator = Validator::standard();
    let _ = validator.validate(&token, &ValidationMode::MINIMAL);
});
