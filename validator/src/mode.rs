//! Validation modes: which checks run and how failures surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// What happens when a check fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    /// Run every check and return the failures as a result.
    #[default]
    CollectAll,
    /// Raise on the first failure.
    FailOnFirst,
    /// Run every check, then raise if any failed.
    FailAtEnd,
}

impl FromStr for FailureMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "collect-all" => Ok(Self::CollectAll),
            "fail-on-first" => Ok(Self::FailOnFirst),
            "fail-at-end" => Ok(Self::FailAtEnd),
            other => Err(ValidationError::Config(format!("unknown failure mode: {other}"))),
        }
    }
}

/// Independent check flags plus the failure mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMode {
    /// The token must have reached its destination, not merely be en route.
    pub public_value: bool,
    /// The creator must be a certified person, or the token must sit in a
    /// valid fork/merge cycle.
    pub validate_creation: bool,
    /// First recipients of tax and sustainability tokens must be the right
    /// certified institutions.
    pub validate_purpose: bool,
    /// Unreachable lookups are recorded as unverified instead of raised.
    pub offline: bool,
    pub failure_mode: FailureMode,
}

impl ValidationMode {
    /// Structure, hash chain and signatures only. Needs no lookups.
    pub const MINIMAL: Self = Self {
        public_value: false,
        validate_creation: false,
        validate_purpose: false,
        offline: false,
        failure_mode: FailureMode::CollectAll,
    };

    pub const FULL: Self = Self {
        public_value: true,
        validate_creation: true,
        validate_purpose: true,
        offline: false,
        failure_mode: FailureMode::CollectAll,
    };

    pub const OFFLINE: Self = Self {
        offline: true,
        ..Self::FULL
    };

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    /// Whether every content check is on; only such verdicts are cached.
    pub fn is_complete(&self) -> bool {
        self.public_value && self.validate_creation && self.validate_purpose
    }

    pub fn needs_lookups(&self) -> bool {
        self.validate_creation || self.validate_purpose
    }
}

impl Default for ValidationMode {
    fn default() -> Self {
        Self::FULL
    }
}

impl FromStr for ValidationMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::MINIMAL),
            "full" => Ok(Self::FULL),
            "offline" => Ok(Self::OFFLINE),
            other => Err(ValidationError::Config(format!("unknown validation mode: {other}"))),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.public_value {
            flags.push("public-value");
        }
        if self.validate_creation {
            flags.push("creation");
        }
        if self.validate_purpose {
            flags.push("purpose");
        }
        if self.offline {
            flags.push("offline");
        }
        if flags.is_empty() {
            flags.push("minimal");
        }
        write!(f, "{} ({:?})", flags.join("+"), self.failure_mode)
    }
}
