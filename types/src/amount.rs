//! Fixed-point token value.
//!
//! Values are represented as raw integers (u128) counting 10^-8 units to avoid
//! floating-point errors. One whole unit is `100_000_000` raw.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Number of fractional decimal digits.
pub const DECIMALS: u32 = 8;
/// Raw units in one whole unit.
pub const UNIT_RAW: u128 = 10u128.pow(DECIMALS);

/// A token amount or value.
///
/// Serialized as its 8-digit decimal string so JSON readers never see a
/// 128-bit number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Value(u128);

impl Value {
    pub const ZERO: Self = Self(0);
    /// 1.00000000
    pub const UNIT: Self = Self(UNIT_RAW);
    /// 0.00000001, the smallest representable amount.
    pub const MINIMAL: Self = Self(1);

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole units (no fractional part).
    pub const fn from_units(units: u128) -> Self {
        Self(units.saturating_mul(UNIT_RAW))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl Add for Value {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Value {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Value {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Value::ZERO, Value::saturating_add)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:08}", self.0 / UNIT_RAW, self.0 % UNIT_RAW)
    }
}

impl From<Value> for String {
    fn from(value: Value) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Value {
    type Error = ParseValueError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Error returned when a decimal string cannot be parsed as a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value {input:?}: {reason}")]
pub struct ParseValueError {
    pub input: String,
    pub reason: &'static str,
}

impl FromStr for Value {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseValueError {
            input: s.to_string(),
            reason,
        };
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("expected decimal digits before the point"));
        }
        if frac.len() > DECIMALS as usize {
            return Err(err("more than 8 fractional digits"));
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("expected decimal digits after the point"));
        }
        let whole: u128 = whole.parse().map_err(|_| err("whole part out of range"))?;
        let mut frac_raw: u128 = 0;
        for (i, b) in frac.bytes().enumerate() {
            frac_raw += u128::from(b - b'0') * 10u128.pow(DECIMALS - 1 - i as u32);
        }
        whole
            .checked_mul(UNIT_RAW)
            .and_then(|w| w.checked_add(frac_raw))
            .map(Self)
            .ok_or_else(|| err("value out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_eight_digits() {
        assert_eq!(Value::UNIT.to_string(), "1.00000000");
        assert_eq!(Value::MINIMAL.to_string(), "0.00000001");
        assert_eq!(Value::from_raw(83_314_661).to_string(), "0.83314661");
    }

    #[test]
    fn parse_accepts_short_fractions() {
        assert_eq!("1".parse::<Value>().unwrap(), Value::UNIT);
        assert_eq!("0.5".parse::<Value>().unwrap(), Value::from_raw(50_000_000));
        assert_eq!("12.00000001".parse::<Value>().unwrap(), Value::from_raw(1_200_000_001));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Value>().is_err());
        assert!(".5".parse::<Value>().is_err());
        assert!("1.000000001".parse::<Value>().is_err());
        assert!("-1".parse::<Value>().is_err());
        assert!("1.2x".parse::<Value>().is_err());
    }

    #[test]
    fn sum_saturates() {
        let total: Value = [Value::from_raw(u128::MAX), Value::UNIT].into_iter().sum();
        assert_eq!(total.raw(), u128::MAX);
    }
}
