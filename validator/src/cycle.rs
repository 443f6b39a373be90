//! Fork and merge reference cycles.
//!
//! A fork source `S` split into tokens `C0..Cn`, and a merge of `M0..Mn`
//! into `N`, form these cycles:
//!
//! ```text
//! S.terminator ──fork-to──▶ C0 ──fork-with──▶ … ──fork-with──▶ Cn ──fork-from──▶ S
//! N ──merge-from──▶ M0.terminator ──merge-with──▶ … Mn.terminator ──merge-to──▶ N
//! ```
//!
//! The walk starts at the token under validation, resolves each reference
//! through the repository, and must come back to where it started.

use std::collections::HashSet;

use custody_token::{Reference, ReferenceRole, Token, MIN_FORK_TOKENS, MIN_MERGE_TOKENS};
use custody_types::{Failure, FailureKind, TokenId, Value};

use crate::error::ValidationError;
use crate::result::Collector;
use crate::signature::{verify_header, verify_terminator};
use crate::validator::TokenCheck;

const FIELD: &str = "header.ref";

fn not_closed(message: String) -> Failure {
    Failure::new(FailureKind::ReferenceCycleNotClosed, FIELD, message)
}

/// Bookkeeping shared by both walks.
struct Walk {
    hops: usize,
    visited: HashSet<TokenId>,
}

impl Walk {
    fn new(start: TokenId) -> Self {
        Self {
            hops: 0,
            visited: HashSet::from([start]),
        }
    }
}

/// The terminator's single reference, if the token was terminated.
fn terminator_reference(token: &Token) -> Option<&Reference> {
    match token.terminator()?.references() {
        [reference] => Some(reference),
        _ => None,
    }
}

impl TokenCheck<'_> {
    /// Resolve the next token of a cycle. `None` ends the walk; the reason
    /// is already recorded.
    fn step(&self, walk: &mut Walk, reference: &Reference, out: &mut Collector) -> Result<Option<Token>, ValidationError> {
        walk.hops += 1;
        let max = self.validator.max_cycle_length();
        if walk.hops > max {
            out.push(not_closed(format!("no closure within {max} hops")))?;
            return Ok(None);
        }
        if !walk.visited.insert(reference.target.clone()) {
            out.push(not_closed(format!("{} is reached twice", reference.target)))?;
            return Ok(None);
        }
        tracing::trace!(hop = walk.hops, role = %reference.role, target = %reference.target, "cycle step");
        self.validator.find_token(&reference.target, self.mode, out, FIELD)
    }

    fn same_family(&self, other: &Token, out: &mut Collector) -> Result<bool, ValidationError> {
        let ours = self.token.header();
        let theirs = other.header();
        if ours.currency() == theirs.currency()
            && ours.algorithm() == theirs.algorithm()
            && ours.version() == theirs.version()
        {
            return Ok(true);
        }
        out.push(Failure::new(
            FailureKind::CurrencyMixed,
            FIELD,
            format!("{} does not share currency, algorithm and version with {}", other.id(), self.token.id()),
        ))?;
        Ok(false)
    }

    /// Consecutive fork-created tokens are stamped one tick apart.
    fn fork_tick(&self, previous: &Token, next: &Token, out: &mut Collector) -> Result<(), ValidationError> {
        let expected = previous.header().timestamp().next();
        if next.header().timestamp() != expected {
            out.push(Failure::mismatch(
                format!("{FIELD}.ts"),
                expected,
                format!("{} on {}", next.header().timestamp(), next.id()),
            ))?;
        }
        Ok(())
    }

    pub(crate) fn walk_fork(&self, out: &mut Collector) -> Result<(), ValidationError> {
        let start_id = self.token.id();
        let mut walk = Walk::new(start_id.clone());

        // Forward from the token under validation to the last created token.
        let mut tail = vec![self.token.clone()];
        let source_ref = loop {
            let current = &tail[tail.len() - 1];
            let Some(reference) = current.header().reference().cloned() else {
                out.push(not_closed(format!("{} carries no fork reference", current.id())))?;
                return Ok(());
            };
            match reference.role {
                ReferenceRole::ForkFrom => break reference,
                ReferenceRole::ForkWith => {
                    let Some(next) = self.step(&mut walk, &reference, out)? else {
                        return Ok(());
                    };
                    self.fork_tick(current, &next, out)?;
                    tail.push(next);
                }
                other => {
                    out.push(Failure::mismatch(FIELD, "fork-with or fork-from", other))?;
                    return Ok(());
                }
            }
        };

        let Some(source) = self.step(&mut walk, &source_ref, out)? else {
            return Ok(());
        };
        let Some(fork_to) = terminator_reference(&source)
            .filter(|r| r.role == ReferenceRole::ForkTo)
            .cloned()
        else {
            out.push(not_closed(format!("{} was not forked", source.id())))?;
            return Ok(());
        };

        // From the first created token round to the token under validation.
        let mut head: Vec<Token> = Vec::new();
        let mut reference = fork_to;
        while reference.target != start_id {
            let Some(next) = self.step(&mut walk, &reference, out)? else {
                return Ok(());
            };
            if let Some(previous) = head.last() {
                self.fork_tick(previous, &next, out)?;
            }
            match next.header().reference() {
                Some(r) if r.role == ReferenceRole::ForkWith => reference = r.clone(),
                _ => {
                    out.push(not_closed(format!(
                        "fork of {} does not lead back to {start_id}",
                        source.id()
                    )))?;
                    return Ok(());
                }
            }
            head.push(next);
        }
        if let Some(previous) = head.last() {
            self.fork_tick(previous, self.token, out)?;
        }

        head.extend(tail);
        self.fork_balance(&source, &head, out)
    }

    /// Checks over a closed fork: created tokens in cycle order.
    fn fork_balance(&self, source: &Token, created: &[Token], out: &mut Collector) -> Result<(), ValidationError> {
        if created.len() < MIN_FORK_TOKENS {
            out.push(Failure::out_of_range(
                FIELD,
                format!("fork creates {} token(s), needs {MIN_FORK_TOKENS}", created.len()),
            ))?;
        }
        let mut family = self.same_family(source, out)?;
        let owner = source.last_owner();
        let origin = source.header();
        let start_id = self.token.id();

        for (i, token) in created.iter().enumerate() {
            let context = format!("fork[{i}]");
            let header = token.header();
            family &= self.same_family(token, out)?;
            if header.recipient() != owner {
                out.push(Failure::mismatch(format!("{context}.rcp"), owner, header.recipient()))?;
            }
            if header.location() != origin.location() {
                out.push(Failure::mismatch(format!("{context}.loc"), origin.location(), header.location()))?;
            }
            if header.target() != origin.target() {
                out.push(Failure::mismatch(format!("{context}.tgt"), origin.target(), header.target()))?;
            }
            if family && token.id() != start_id {
                if let Some(failure) = verify_header(self.algorithm, header, &context) {
                    out.push(failure)?;
                }
            }
        }

        let (Some(first), Some(terminator)) = (created.first(), source.terminator()) else {
            return Ok(());
        };
        let forked_at = first.header().timestamp();
        if forked_at < terminator.timestamp() {
            out.push(Failure::out_of_range(
                format!("{FIELD}.ts"),
                format!("first created token at {forked_at} precedes the fork at {}", terminator.timestamp()),
            ))?;
        }
        if !family {
            return Ok(());
        }
        if let Some(failure) = verify_terminator(self.algorithm, source, "fork.source") {
            out.push(failure)?;
        }
        let Some(currency) = self.currency else {
            return Ok(());
        };
        let available = match source.value_at(currency, forked_at) {
            Ok(value) => value,
            Err(e) => return out.push(Failure::out_of_range(FIELD, format!("value of {}: {e}", source.id()))),
        };
        let requested = created
            .iter()
            .fold(Value::ZERO, |sum, token| sum.saturating_add(token.header().amount()));
        if requested > available {
            out.push(Failure::out_of_range(
                FIELD,
                format!("fork creates {requested} from {available}"),
            ))?;
        }
        Ok(())
    }

    pub(crate) fn walk_merge(&self, out: &mut Collector) -> Result<(), ValidationError> {
        let start_id = self.token.id();
        let mut walk = Walk::new(start_id.clone());
        let Some(mut reference) = self.token.header().reference().cloned() else {
            return Ok(());
        };

        let mut merged = Vec::new();
        loop {
            let Some(token) = self.step(&mut walk, &reference, out)? else {
                return Ok(());
            };
            let next = terminator_reference(&token).cloned();
            let id = token.id();
            merged.push(token);
            match next {
                Some(r) if r.role == ReferenceRole::MergeWith => reference = r,
                Some(r) if r.role == ReferenceRole::MergeTo && r.target == start_id => break,
                Some(r) if r.role == ReferenceRole::MergeTo => {
                    out.push(not_closed(format!("merge ends at {} instead of {start_id}", r.target)))?;
                    return Ok(());
                }
                _ => {
                    out.push(not_closed(format!("{id} was not merged")))?;
                    return Ok(());
                }
            }
        }
        self.merge_balance(&merged, out)
    }

    /// Checks over a closed merge: merged tokens in cycle order.
    fn merge_balance(&self, merged: &[Token], out: &mut Collector) -> Result<(), ValidationError> {
        if merged.len() < MIN_MERGE_TOKENS {
            out.push(Failure::out_of_range(
                FIELD,
                format!("merge combines {} token(s), needs {MIN_MERGE_TOKENS}", merged.len()),
            ))?;
        }
        let header = self.token.header();
        let merged_at = header.timestamp();
        let mut available = Value::ZERO;
        let mut complete = true;

        for (i, token) in merged.iter().enumerate() {
            let context = format!("merge[{i}]");
            if !self.same_family(token, out)? {
                complete = false;
                continue;
            }
            if token.last_owner() != header.recipient() {
                out.push(Failure::mismatch(format!("{context}.rcp"), header.recipient(), token.last_owner()))?;
            }
            if let Some(terminator) = token.terminator() {
                if terminator.timestamp() > merged_at {
                    out.push(Failure::out_of_range(
                        format!("{context}.ts"),
                        format!("merged at {} after the new token at {merged_at}", terminator.timestamp()),
                    ))?;
                }
            }
            if let Some(failure) = verify_terminator(self.algorithm, token, &context) {
                out.push(failure)?;
            }
            if let Some(currency) = self.currency {
                match token.value_at(currency, merged_at) {
                    Ok(value) => available = available.saturating_add(value),
                    Err(e) => {
                        complete = false;
                        out.push(Failure::out_of_range(
                            format!("{context}.ts"),
                            format!("value of {}: {e}", token.id()),
                        ))?;
                    }
                }
            }
        }

        if complete && self.currency.is_some() && header.amount() > available {
            out.push(Failure::out_of_range(
                "header.amt",
                format!("merge creates {} from {available}", header.amount()),
            ))?;
        }
        Ok(())
    }
}
