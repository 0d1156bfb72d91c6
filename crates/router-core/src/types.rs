//! Core type definitions for the auto-router

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ValueError;

/// Token identifier (ticker-hash format, e.g. "WEGLD-bd4d79")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Pool address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PoolId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// Token amount in the token's smallest denomination.
///
/// Backed by an arbitrary-precision unsigned integer so reserves of 10^27 and
/// beyond stay exact. Serialized as a decimal string.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// `whole * 10^decimals`, e.g. `Amount::scaled(1000, 18)` for 1000 tokens
    /// with 18 decimals.
    pub fn scaled(whole: u64, decimals: u32) -> Self {
        Self(BigUint::from(whole) * BigUint::from(10u32).pow(decimals))
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Lossy conversion for display analytics only
    pub fn to_f64_lossy(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::MAX)
    }
}

impl From<BigUint> for Amount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValueError::InvalidAmount(s.to_string()));
        }
        BigUint::from_str(trimmed)
            .map(Self)
            .map_err(|_| ValueError::InvalidAmount(s.to_string()))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an unsigned integer or a decimal integer string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
                u64::try_from(v)
                    .map(Amount::from)
                    .map_err(|_| E::custom(format!("negative amount {}", v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

// ---------------------------------------------------------------------------
// Fee fraction
// ---------------------------------------------------------------------------

/// Maximum number of fractional digits accepted when parsing a fee
const MAX_FEE_DECIMALS: u32 = 18;

/// Exact fraction of the swap input taken as fee (`numerator / denominator`).
///
/// `0.003` (0.3%) is `FeeFraction { numerator: 3, denominator: 1000 }`, which
/// compares equal to `300 / 100_000`.
#[derive(Debug, Clone, Copy)]
pub struct FeeFraction {
    numerator: u64,
    denominator: u64,
}

impl FeeFraction {
    pub const ZERO: FeeFraction = FeeFraction {
        numerator: 0,
        denominator: 1,
    };

    /// Create a fee fraction. The fee must be strictly below 100%.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, ValueError> {
        if denominator == 0 {
            return Err(ValueError::InvalidFee {
                value: format!("{}/{}", numerator, denominator),
                reason: "denominator is zero".to_string(),
            });
        }
        if numerator >= denominator {
            return Err(ValueError::InvalidFee {
                value: format!("{}/{}", numerator, denominator),
                reason: "fee must be below 100%".to_string(),
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// `denominator - numerator`: the share of input that reaches the curve
    pub fn complement(&self) -> u64 {
        self.denominator - self.numerator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }
}

impl Default for FeeFraction {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for FeeFraction {
    fn eq(&self, other: &Self) -> bool {
        self.numerator as u128 * other.denominator as u128
            == other.numerator as u128 * self.denominator as u128
    }
}

impl Eq for FeeFraction {}

impl PartialOrd for FeeFraction {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FeeFraction {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.numerator as u128 * other.denominator as u128)
            .cmp(&(other.numerator as u128 * self.denominator as u128))
    }
}

impl fmt::Display for FeeFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scale = 0u32;
        let mut denom = self.denominator;
        while denom % 10 == 0 && denom > 1 {
            denom /= 10;
            scale += 1;
        }
        if denom != 1 {
            return write!(f, "{}/{}", self.numerator, self.denominator);
        }
        if scale == 0 {
            return write!(f, "{}", self.numerator);
        }
        let digits = format!("{:0width$}", self.numerator, width = scale as usize);
        let (int_part, frac_part) = digits.split_at(digits.len() - scale as usize);
        let int_part = if int_part.is_empty() { "0" } else { int_part };
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            write!(f, "{}", int_part)
        } else {
            write!(f, "{}.{}", int_part, frac_part)
        }
    }
}

impl FromStr for FeeFraction {
    type Err = ValueError;

    /// Accepts a decimal fraction ("0.003") or an explicit ratio ("3/1000").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |reason: &str| ValueError::InvalidFee {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        if let Some((num, denom)) = trimmed.split_once('/') {
            let num: u64 = num.trim().parse().map_err(|_| invalid("bad numerator"))?;
            let denom: u64 = denom
                .trim()
                .parse()
                .map_err(|_| invalid("bad denominator"))?;
            return Self::new(num, denom);
        }

        let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid("empty value"));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("expected a decimal fraction such as 0.003"));
        }
        if int_part.trim_start_matches('0') != "" {
            return Err(invalid("fee must be below 100%"));
        }
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.len() as u32 > MAX_FEE_DECIMALS {
            return Err(invalid("too many decimal places"));
        }
        if frac_part.is_empty() {
            return Ok(Self::ZERO);
        }
        let numerator: u64 = frac_part.parse().map_err(|_| invalid("bad digits"))?;
        let denominator = 10u64.pow(frac_part.len() as u32);
        Self::new(numerator, denominator)
    }
}

impl Serialize for FeeFraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeeFraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Default number of hops a route may take
pub const DEFAULT_MAX_HOPS: u8 = 4;
