//! Owner addresses: a public key tagged with the role of its holder.

use crate::error::TypeError;
use crate::keys::PublicKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role an address was registered for.
///
/// Level-bearing variants name the location depth of the institution they
/// represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AddressType {
    Pseudonym,
    NaturalPersonChild,
    NaturalPersonAdult,
    CommunityRepresentative(u8),
    CommunityProject(u8),
    SustainabilityRepresentative(u8),
    SustainabilityProject(u8),
    Company,
    IdentityServiceOfficer,
}

impl AddressType {
    pub fn is_natural_person(&self) -> bool {
        matches!(self, Self::NaturalPersonChild | Self::NaturalPersonAdult)
    }

    /// Location level of a representative or project address.
    pub fn level(&self) -> Option<u8> {
        match self {
            Self::CommunityRepresentative(l)
            | Self::CommunityProject(l)
            | Self::SustainabilityRepresentative(l)
            | Self::SustainabilityProject(l) => Some(*l),
            _ => None,
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            Self::Pseudonym => "pseudonym",
            Self::NaturalPersonChild => "person-child",
            Self::NaturalPersonAdult => "person-adult",
            Self::CommunityRepresentative(_) => "community-rep",
            Self::CommunityProject(_) => "community-project",
            Self::SustainabilityRepresentative(_) => "sustainability-rep",
            Self::SustainabilityProject(_) => "sustainability-project",
            Self::Company => "company",
            Self::IdentityServiceOfficer => "identity-officer",
        }
    }

    fn code(&self) -> u8 {
        match self {
            Self::Pseudonym => 0,
            Self::NaturalPersonChild => 1,
            Self::NaturalPersonAdult => 2,
            Self::CommunityRepresentative(_) => 3,
            Self::CommunityProject(_) => 4,
            Self::SustainabilityRepresentative(_) => 5,
            Self::SustainabilityProject(_) => 6,
            Self::Company => 7,
            Self::IdentityServiceOfficer => 8,
        }
    }

    /// Two bytes: type code and level (0 when the type has none).
    pub fn to_bytes(&self) -> [u8; 2] {
        [self.code(), self.level().unwrap_or(0)]
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level() {
            Some(level) => write!(f, "{}@{}", self.tag(), level),
            None => f.write_str(self.tag()),
        }
    }
}

impl FromStr for AddressType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidAddressType(s.to_string());
        let (tag, level) = match s.split_once('@') {
            Some((tag, level)) => (tag, Some(level.parse::<u8>().map_err(|_| invalid())?)),
            None => (s, None),
        };
        let parsed = match (tag, level) {
            ("pseudonym", None) => Self::Pseudonym,
            ("person-child", None) => Self::NaturalPersonChild,
            ("person-adult", None) => Self::NaturalPersonAdult,
            ("company", None) => Self::Company,
            ("identity-officer", None) => Self::IdentityServiceOfficer,
            ("community-rep", Some(l)) => Self::CommunityRepresentative(l),
            ("community-project", Some(l)) => Self::CommunityProject(l),
            ("sustainability-rep", Some(l)) => Self::SustainabilityRepresentative(l),
            ("sustainability-project", Some(l)) => Self::SustainabilityProject(l),
            _ => return Err(invalid()),
        };
        Ok(parsed)
    }
}

impl From<AddressType> for String {
    fn from(kind: AddressType) -> Self {
        kind.to_string()
    }
}

impl TryFrom<String> for AddressType {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A cryptographic owner identity.
///
/// Equality and ordering compare the address type (including its level)
/// before the key, so the same key registered under two roles yields two
/// distinct addresses.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "t")]
    pub kind: AddressType,
    #[serde(rename = "k")]
    pub key: PublicKey,
}

impl Address {
    pub fn new(kind: AddressType, key: PublicKey) -> Self {
        Self { kind, key }
    }

    /// Canonical bytes: type code, level, then the 32 key bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(34);
        out.extend_from_slice(&self.kind.to_bytes());
        out.extend_from_slice(self.key.as_bytes());
        out
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, hex::encode(&self.key.0[..8]))
    }
}
