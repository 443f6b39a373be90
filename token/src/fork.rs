//! Splitting one token into several.
//!
//! ```text
//! source ──fork-to──▶ created[0] ──fork-with──▶ created[1] … created[n-1] ──fork-from──▶ source
//! ```
//!
//! Created token `i+1` is stamped exactly one tick after token `i`.

use custody_crypto::Algorithm;
use custody_currency::Currency;
use custody_types::{KeyPair, Timestamp, TokenId, Value};

use crate::chain::check_algorithm;
use crate::error::TokenError;
use crate::header::Header;
use crate::reference::{Reference, ReferenceRole};
use crate::token::Token;

/// Fewest tokens a fork may create.
pub const MIN_FORK_TOKENS: usize = 2;

/// The result of a fork: the terminated source and the new tokens in cycle order.
#[derive(Clone, Debug)]
pub struct Forked {
    pub source: Token,
    pub created: Vec<Token>,
}

/// Split `source` into tokens of the given `amounts`, all owned by `owner`.
///
/// The source's value at `at`, counting the terminator line, must cover the
/// sum of `amounts`.
pub fn fork(
    source: &Token,
    owner: &KeyPair,
    amounts: &[Value],
    at: Timestamp,
    algorithm: &dyn Algorithm,
    currency: &dyn Currency,
) -> Result<Forked, TokenError> {
    if amounts.len() < MIN_FORK_TOKENS {
        return Err(TokenError::CycleTooShort {
            kind: "fork",
            min: MIN_FORK_TOKENS,
            got: amounts.len(),
        });
    }
    let header = source.header();
    check_algorithm(algorithm, header.algorithm())?;
    let recipient = source.check_owner(owner)?.clone();

    let available = currency.value(
        header.amount(),
        header.timestamp(),
        at,
        source.transactions().len() + 1,
    )?;
    let requested = amounts
        .iter()
        .try_fold(Value::ZERO, |sum, amount| sum.checked_add(*amount))
        .ok_or(TokenError::InsufficientValue {
            requested: Value::from_raw(u128::MAX),
            available,
        })?;
    if requested > available {
        return Err(TokenError::InsufficientValue { requested, available });
    }

    let stamps: Vec<Timestamp> = std::iter::successors(Some(at), |ts| Some(ts.next()))
        .take(amounts.len())
        .collect();
    let id_at = |ts: Timestamp| TokenId {
        timestamp: ts,
        ..source.id()
    };

    let mut created = Vec::with_capacity(amounts.len());
    for (i, (amount, ts)) in amounts.iter().zip(&stamps).enumerate() {
        let reference = match stamps.get(i + 1) {
            Some(next) => Reference::new(id_at(*next), ReferenceRole::ForkWith),
            None => Reference::new(source.id(), ReferenceRole::ForkFrom),
        };
        let created_header = Header::builder()
            .version(header.version())
            .algorithm(header.algorithm())
            .currency(header.currency())
            .amount(*amount)
            .timestamp(*ts)
            .location(header.location().clone())
            .target(*header.target())
            .recipient(recipient.clone())
            .reference(Some(reference))
            .sign(algorithm, &owner.private)?;
        created.push(Token::new(created_header));
    }

    let mut terminated = source.clone();
    terminated.terminate(
        algorithm,
        owner,
        at,
        Reference::new(id_at(at), ReferenceRole::ForkTo),
    )?;
    tracing::debug!(source = %source.id(), tokens = created.len(), %requested, %available, "forked");
    Ok(Forked {
        source: terminated,
        created,
    })
}
