//! Hierarchical location codes.
//!
//! A location is an ordered list of segments, most general first
//! (`DE/BY/09162`). Level 0 is the whole world and has no segments.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering of the level-0 location.
pub const WORLD: &str = "*";

/// An immutable hierarchical location code.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location {
    segments: Vec<String>,
}

impl Location {
    pub fn world() -> Self {
        Self::default()
    }

    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Result<Self, TypeError> {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for seg in &segments {
            if seg.is_empty() || seg.contains('/') || seg == WORLD {
                return Err(TypeError::InvalidLocation(seg.clone()));
            }
        }
        Ok(Self { segments })
    }

    /// Number of segments; 0 for the world.
    pub fn level(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The enclosing location at `level`, or `None` if this location is less specific.
    pub fn prefix(&self, level: usize) -> Option<Location> {
        (level <= self.segments.len()).then(|| Location {
            segments: self.segments[..level].to_vec(),
        })
    }

    /// Whether `self` lies inside (or equals) `area`.
    pub fn is_within(&self, area: &Location) -> bool {
        self.segments.starts_with(&area.segments)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str(WORLD)
        } else {
            f.write_str(&self.segments.join("/"))
        }
    }
}

impl FromStr for Location {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == WORLD {
            return Ok(Self::world());
        }
        Self::new(s.split('/'))
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.to_string()
    }
}

impl TryFrom<String> for Location {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
