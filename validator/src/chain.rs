//! Transaction chain checks: ordering, chained signatures, terminator shape,
//! purpose of the first transfer and arrival at the destination.

use custody_token::Transaction;
use custody_types::{AddressType, Failure, FailureKind, TargetType};

use crate::error::ValidationError;
use crate::result::Collector;
use crate::signature::{check_signature, token_failure};
use crate::validator::TokenCheck;

/// Transfers a tax or sustainability token needs before its value is public.
pub const MIN_TRANSFERS_TO_DESTINATION: usize = 2;

impl TokenCheck<'_> {
    pub(crate) fn transactions(&self, out: &mut Collector) -> Result<(), ValidationError> {
        let header = self.token.header();
        let mut owner = header.recipient();
        let mut previous_ts = header.timestamp();
        // Unsigned header: already reported; the chain cannot be followed.
        let mut predecessor = header.hash_to_chain(self.algorithm).ok();

        for (i, tx) in self.token.transactions().iter().enumerate() {
            let field = format!("tx[{i}]");
            if tx.timestamp() <= previous_ts {
                out.push(Failure::out_of_range(
                    format!("{field}.ts"),
                    format!("{} is not after {previous_ts}", tx.timestamp()),
                ))?;
            }
            if tx.timestamp() > self.horizon() {
                out.push(Failure::new(
                    FailureKind::TimestampInFuture,
                    format!("{field}.ts"),
                    format!("{} is after {}", tx.timestamp(), self.now),
                ))?;
            }
            self.terminator_shape(i, tx, out)?;

            predecessor = match predecessor {
                Some(prev) => match (tx.hash_to_sign(self.algorithm, &prev), tx.signature()) {
                    (Err(e), _) => {
                        out.push(token_failure(&field, e))?;
                        None
                    }
                    (Ok(_), None) => {
                        out.push(Failure::missing(format!("{field}.sig")))?;
                        None
                    }
                    (Ok(hash), Some(signature)) => {
                        let sig_field = format!("{field}.sig");
                        if let Some(failure) = check_signature(self.algorithm, signature, owner, &hash, &sig_field) {
                            out.push(failure)?;
                        }
                        tx.hash_to_chain(self.algorithm, &prev).ok()
                    }
                },
                None => None,
            };

            if i == 0 && self.mode.validate_purpose && !header.target().is_person_income() {
                self.first_transfer_purpose(tx, out)?;
            }
            if let Some(recipient) = tx.recipient() {
                owner = recipient;
            }
            previous_ts = tx.timestamp();
        }
        Ok(())
    }

    /// Only the last line may lack a recipient, and only that line carries
    /// exactly one fork/merge reference.
    fn terminator_shape(&self, index: usize, tx: &Transaction, out: &mut Collector) -> Result<(), ValidationError> {
        let field = format!("tx[{index}]");
        let is_last = index + 1 == self.token.transactions().len();
        if !tx.is_terminator() {
            if !tx.references().is_empty() {
                out.push(Failure::new(
                    FailureKind::ValueMismatch,
                    format!("{field}.ref"),
                    "references are only allowed on a terminator line",
                ))?;
            }
            return Ok(());
        }
        if !is_last {
            out.push(Failure::new(
                FailureKind::ValueMismatch,
                field.as_str(),
                "transactions follow a terminator line",
            ))?;
        }
        match tx.references() {
            [reference] if reference.role.is_terminator_role() => Ok(()),
            references => {
                let roles: Vec<&str> = references.iter().map(|r| r.role.as_str()).collect();
                out.push(Failure::mismatch(
                    format!("{field}.ref"),
                    "one fork-to, merge-with or merge-to reference",
                    format!("[{}]", roles.join(", ")),
                ))
            }
        }
    }

    /// The creator signs the first transfer as a certified person, handing
    /// the token to the representative its target names.
    fn first_transfer_purpose(&self, tx: &Transaction, out: &mut Collector) -> Result<(), ValidationError> {
        let header = self.token.header();
        let creator = header.recipient();
        if creator.kind.is_natural_person() {
            self.certified_identity(creator, tx.timestamp(), header.location(), "tx[0].signer", out)?;
        } else {
            out.push(Failure::not_in_set("tx[0].signer.t", creator.kind))?;
        }

        let Some(recipient) = tx.recipient() else {
            return Ok(());
        };
        let target = header.target();
        let expected = match target.kind {
            TargetType::PersonIncome => return Ok(()),
            TargetType::CommunityTax => AddressType::CommunityRepresentative(target.level),
            TargetType::Sustainability => AddressType::SustainabilityRepresentative(target.level),
        };
        if recipient.kind != expected {
            return out.push(Failure::mismatch("tx[0].rcp.t", expected, recipient.kind));
        }
        match header.location().prefix(usize::from(target.level)) {
            Some(area) => self.certified_identity(recipient, tx.timestamp(), &area, "tx[0].rcp", out),
            // Reported by the header check.
            None => Ok(()),
        }
    }

    pub(crate) fn destination(&self, out: &mut Collector) -> Result<(), ValidationError> {
        let target = self.token.header().target();
        if !self.mode.public_value || target.is_person_income() {
            return Ok(());
        }
        let transfers = self
            .token
            .transactions()
            .iter()
            .filter(|tx| !tx.is_terminator())
            .count();
        if transfers < MIN_TRANSFERS_TO_DESTINATION {
            out.push(Failure::out_of_range(
                "txs",
                format!(
                    "{target} token has {transfers} transfer(s), needs {MIN_TRANSFERS_TO_DESTINATION} to reach its destination"
                ),
            ))?;
        }
        Ok(())
    }
}
