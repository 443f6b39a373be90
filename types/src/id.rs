//! Token identity key.

use crate::location::Location;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity coordinates of a token: what a Reference points at and
/// what a repository is keyed by.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId {
    #[serde(rename = "ts")]
    pub timestamp: Timestamp,
    #[serde(rename = "loc")]
    pub location: Location,
    #[serde(rename = "v")]
    pub version: u32,
    #[serde(rename = "alg")]
    pub algorithm: String,
    #[serde(rename = "cur")]
    pub currency: String,
}

impl TokenId {
    /// A filesystem- and URL-safe rendering, unique per identity.
    pub fn to_key_string(&self) -> String {
        let location = self.location.segments().join(".");
        format!(
            "{}-{}-v{}-{}-{}",
            self.currency,
            self.algorithm,
            self.version,
            if location.is_empty() { "world" } else { location.as_str() },
            self.timestamp.as_nanos()
        )
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}/{}/v{}/{}",
            self.currency, self.timestamp, self.location, self.version, self.algorithm
        )
    }
}
