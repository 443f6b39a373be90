//! Signature checks shared by the header, chain and cycle passes.

use custody_crypto::Algorithm;
use custody_token::{Header, Token, TokenError};
use custody_types::{Address, Failure, FailureKind, Hash, Signature};

/// `None` when `signature` verifies against `signer`.
pub(crate) fn check_signature(
    algorithm: &dyn Algorithm,
    signature: &Signature,
    signer: &Address,
    hash: &Hash,
    field: &str,
) -> Option<Failure> {
    match algorithm.verify_signature(signature, signer, hash) {
        Ok(true) => None,
        Ok(false) => Some(Failure::new(
            FailureKind::SignatureInvalid,
            field,
            format!("does not verify against {signer}"),
        )),
        Err(e) => Some(Failure::new(FailureKind::SignatureInvalid, field, e.to_string())),
    }
}

pub(crate) fn token_failure(field: &str, error: TokenError) -> Failure {
    match error {
        TokenError::MissingField(key) => Failure::missing(format!("{field}.{key}")),
        other => Failure::new(FailureKind::UnexpectedException, field, other.to_string()),
    }
}

/// The header signature, checked against the header's recipient.
pub(crate) fn verify_header(algorithm: &dyn Algorithm, header: &Header, field: &str) -> Option<Failure> {
    let Some(signature) = header.signature() else {
        return Some(Failure::missing(format!("{field}.sig")));
    };
    match header.hash_to_sign(algorithm) {
        Ok(hash) => check_signature(algorithm, signature, header.recipient(), &hash, &format!("{field}.sig")),
        Err(e) => Some(token_failure(field, e)),
    }
}

/// The terminator line of a forked or merged token, checked against the
/// owner it took the token from.
pub(crate) fn verify_terminator(algorithm: &dyn Algorithm, token: &Token, field: &str) -> Option<Failure> {
    let (last, earlier) = token.transactions().split_last()?;
    let field = format!("{field}.tx[{}]", earlier.len());
    let predecessor = earlier
        .iter()
        .fold(token.header().hash_to_chain(algorithm), |prev, tx| {
            prev.and_then(|prev| tx.hash_to_chain(algorithm, &prev))
        });
    let hash = match predecessor.and_then(|prev| last.hash_to_sign(algorithm, &prev)) {
        Ok(hash) => hash,
        Err(e) => return Some(token_failure(&field, e)),
    };
    match last.signature() {
        Some(signature) => check_signature(algorithm, signature, token.last_owner(), &hash, &format!("{field}.sig")),
        None => Some(Failure::missing(format!("{field}.sig"))),
    }
}
