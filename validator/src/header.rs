//! Header checks and creation legitimacy of unreferenced tokens.

use custody_token::{ReferenceRole, PROTOCOL_VERSION};
use custody_types::{Address, Failure, FailureKind, Location, Timestamp};

use crate::error::ValidationError;
use crate::result::Collector;
use crate::signature::verify_header;
use crate::validator::TokenCheck;

impl TokenCheck<'_> {
    pub(crate) fn header(&self, out: &mut Collector) -> Result<(), ValidationError> {
        let header = self.token.header();

        if header.version() != PROTOCOL_VERSION {
            out.push(Failure::not_in_set("header.v", header.version()))?;
        }
        if header.timestamp() > self.horizon() {
            out.push(Failure::new(
                FailureKind::TimestampInFuture,
                "header.ts",
                format!("{} is after {}", header.timestamp(), self.now),
            ))?;
        }
        if usize::from(header.target().level) > header.location().level() {
            out.push(Failure::out_of_range(
                "header.tgt",
                format!("{} is deeper than location {}", header.target(), header.location()),
            ))?;
        }
        if let Some(reference) = header.reference() {
            if !reference.role.is_header_role() {
                out.push(Failure::mismatch(
                    "header.ref.role",
                    "fork-with, fork-from or merge-from",
                    reference.role,
                ))?;
            }
        }
        if let Some(currency) = self.currency {
            out.extend(currency.validate(
                header.amount(),
                header.target(),
                &header.recipient().kind,
                header.reference().is_some(),
            ))?;
        }
        if let Some(failure) = verify_header(self.algorithm, header, "header") {
            out.push(failure)?;
        }
        Ok(())
    }

    /// Who was allowed to create this token: a certified person, or a
    /// fork/merge cycle.
    pub(crate) fn origin(&self, out: &mut Collector) -> Result<(), ValidationError> {
        if !self.mode.validate_creation {
            return Ok(());
        }
        match self.token.header().reference().map(|r| r.role) {
            None => self.certified_creator(out),
            Some(ReferenceRole::ForkWith | ReferenceRole::ForkFrom) => self.walk_fork(out),
            Some(ReferenceRole::MergeFrom) => self.walk_merge(out),
            // Reported by the header check.
            Some(_) => Ok(()),
        }
    }

    fn certified_creator(&self, out: &mut Collector) -> Result<(), ValidationError> {
        let header = self.token.header();
        let creator = header.recipient();
        if !creator.kind.is_natural_person() {
            return out.push(Failure::not_in_set("header.rcp.t", creator.kind));
        }
        self.certified_identity(creator, header.timestamp(), header.location(), "header.rcp", out)
    }

    /// `address` must have an identity valid at `at`, registered at `location`.
    pub(crate) fn certified_identity(
        &self,
        address: &Address,
        at: Timestamp,
        location: &Location,
        field: &str,
        out: &mut Collector,
    ) -> Result<(), ValidationError> {
        let Some(identity) = self.validator.find_identity(address, at, self.mode, out, field)? else {
            return Ok(());
        };
        if !identity.is_valid_at(at) {
            out.push(Failure::out_of_range(
                field,
                format!("identity of {address} is not valid at {at}"),
            ))?;
        }
        if identity.location != *location {
            out.push(Failure::mismatch(format!("{field}.loc"), location, &identity.location))?;
        }
        Ok(())
    }
}
