//! References between tokens of one fork or merge cycle.

use custody_types::TokenId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TokenError;
use crate::fields::CanonicalWriter;

/// The part a referenced token plays in the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceRole {
    /// Terminator of a forked token, pointing at the first created token.
    ForkTo,
    /// Header of a created token, pointing at the next created token.
    ForkWith,
    /// Header of the last created token, pointing back at the forked token.
    ForkFrom,
    /// Terminator of a merged token, pointing at the next merged token.
    MergeWith,
    /// Terminator of the last merged token, pointing at the new token.
    MergeTo,
    /// Header of the new token, pointing at the first merged token.
    MergeFrom,
}

impl ReferenceRole {
    /// Roles that may appear on a header.
    pub fn is_header_role(&self) -> bool {
        matches!(self, Self::ForkWith | Self::ForkFrom | Self::MergeFrom)
    }

    /// Roles that may appear on a terminating (no-recipient) transaction.
    pub fn is_terminator_role(&self) -> bool {
        matches!(self, Self::ForkTo | Self::MergeWith | Self::MergeTo)
    }

    pub fn is_fork(&self) -> bool {
        matches!(self, Self::ForkTo | Self::ForkWith | Self::ForkFrom)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForkTo => "fork-to",
            Self::ForkWith => "fork-with",
            Self::ForkFrom => "fork-from",
            Self::MergeWith => "merge-with",
            Self::MergeTo => "merge-to",
            Self::MergeFrom => "merge-from",
        }
    }

    fn code(&self) -> u8 {
        match self {
            Self::ForkTo => 1,
            Self::ForkWith => 2,
            Self::ForkFrom => 3,
            Self::MergeWith => 4,
            Self::MergeTo => 5,
            Self::MergeFrom => 6,
        }
    }
}

impl fmt::Display for ReferenceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pointer to another token's identity, tagged with its role.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    #[serde(flatten)]
    pub target: TokenId,
    pub role: ReferenceRole,
}

impl Reference {
    pub fn new(target: TokenId, role: ReferenceRole) -> Self {
        Self { target, role }
    }

    /// Canonical bytes for hashing.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TokenError> {
        let mut w = CanonicalWriter::new();
        w.field("ts", &self.target.timestamp.to_be_bytes())?;
        w.field("loc", self.target.location.to_string().as_bytes())?;
        w.field("v", &self.target.version.to_be_bytes())?;
        w.field("alg", self.target.algorithm.as_bytes())?;
        w.field("cur", self.target.currency.as_bytes())?;
        w.field("role", &[self.role.code()])?;
        Ok(w.into_bytes())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.role, self.target)
    }
}
