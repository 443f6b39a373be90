//! Combining several tokens into one.
//!
//! ```text
//! new ──merge-from──▶ merged[0] ──merge-with──▶ merged[1] … merged[n-1] ──merge-to──▶ new
//! ```

use custody_crypto::Algorithm;
use custody_currency::Currency;
use custody_types::{KeyPair, Timestamp, Value};

use crate::chain::check_algorithm;
use crate::error::TokenError;
use crate::header::Header;
use crate::reference::{Reference, ReferenceRole};
use crate::token::Token;

/// Fewest tokens a merge may combine.
pub const MIN_MERGE_TOKENS: usize = 2;

/// The result of a merge: the terminated inputs in cycle order and the new token.
#[derive(Clone, Debug)]
pub struct Merged {
    pub merged: Vec<Token>,
    pub created: Token,
}

/// Combine `sources`, all owned by `owner`, into one token worth `amount`.
///
/// Every source must share currency, algorithm and version. The new token
/// takes its location and target from the first source.
pub fn merge(
    sources: &[Token],
    owner: &KeyPair,
    amount: Value,
    at: Timestamp,
    algorithm: &dyn Algorithm,
    currency: &dyn Currency,
) -> Result<Merged, TokenError> {
    let first = match sources {
        [first, _, ..] => first,
        _ => {
            return Err(TokenError::CycleTooShort {
                kind: "merge",
                min: MIN_MERGE_TOKENS,
                got: sources.len(),
            })
        }
    };
    let template = first.header();
    check_algorithm(algorithm, template.algorithm())?;
    let recipient = first.check_owner(owner)?.clone();

    let mut available = Value::ZERO;
    for source in sources {
        let header = source.header();
        if header.currency() != template.currency()
            || header.algorithm() != template.algorithm()
            || header.version() != template.version()
        {
            return Err(TokenError::CurrencyMixed);
        }
        if source.check_owner(owner)? != &recipient {
            return Err(TokenError::NotOwner);
        }
        let value = currency.value(header.amount(), header.timestamp(), at, source.transactions().len() + 1)?;
        available = available.saturating_add(value);
    }
    if amount > available {
        return Err(TokenError::InsufficientValue {
            requested: amount,
            available,
        });
    }

    let created_header = Header::builder()
        .version(template.version())
        .algorithm(template.algorithm())
        .currency(template.currency())
        .amount(amount)
        .timestamp(at)
        .location(template.location().clone())
        .target(*template.target())
        .recipient(recipient)
        .reference(Some(Reference::new(first.id(), ReferenceRole::MergeFrom)))
        .sign(algorithm, &owner.private)?;
    let created = Token::new(created_header);

    let mut merged = Vec::with_capacity(sources.len());
    for (i, source) in sources.iter().enumerate() {
        let reference = match sources.get(i + 1) {
            Some(next) => Reference::new(next.id(), ReferenceRole::MergeWith),
            None => Reference::new(created.id(), ReferenceRole::MergeTo),
        };
        let mut terminated = source.clone();
        terminated.terminate(algorithm, owner, at, reference)?;
        merged.push(terminated);
    }
    tracing::debug!(token = %created.id(), inputs = merged.len(), %amount, %available, "merged");
    Ok(Merged { merged, created })
}
