//! Purpose classifiers for newly created value.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deepest location level a target may address.
pub const MAX_LEVEL: u8 = 3;

/// What the created value is meant for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetType {
    /// Basic income of the creating person.
    PersonIncome,
    /// Contribution to a community at some administrative level.
    CommunityTax,
    /// Contribution to sustainability projects.
    Sustainability,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonIncome => "person-income",
            Self::CommunityTax => "community-tax",
            Self::Sustainability => "sustainability",
        }
    }
}

/// A target type bound to a location level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target {
    pub kind: TargetType,
    pub level: u8,
}

impl Target {
    pub const PERSON_INCOME: Target = Target::new(TargetType::PersonIncome, 0);

    pub const fn new(kind: TargetType, level: u8) -> Self {
        Self { kind, level }
    }

    /// The fixed set of officially recognised targets.
    pub fn official() -> Vec<Target> {
        let mut targets = vec![Self::PERSON_INCOME];
        targets.extend((1..=MAX_LEVEL).map(|l| Target::new(TargetType::CommunityTax, l)));
        targets.extend((0..=MAX_LEVEL).map(|l| Target::new(TargetType::Sustainability, l)));
        targets
    }

    pub fn is_official(&self) -> bool {
        match self.kind {
            TargetType::PersonIncome => self.level == 0,
            TargetType::CommunityTax => (1..=MAX_LEVEL).contains(&self.level),
            TargetType::Sustainability => self.level <= MAX_LEVEL,
        }
    }

    pub fn is_person_income(&self) -> bool {
        self.kind == TargetType::PersonIncome
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind.as_str(), self.level)
    }
}

impl FromStr for Target {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidTarget(s.to_string());
        let (kind, level) = s.split_once('@').ok_or_else(invalid)?;
        let kind = match kind {
            "person-income" => TargetType::PersonIncome,
            "community-tax" => TargetType::CommunityTax,
            "sustainability" => TargetType::Sustainability,
            _ => return Err(invalid()),
        };
        let level = level.parse().map_err(|_| invalid())?;
        Ok(Target::new(kind, level))
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

impl TryFrom<String> for Target {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
