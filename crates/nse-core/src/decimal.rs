//! Precision-safe decimal types for fundamentals.
//!
//! Uses `rust_decimal` so threshold comparisons are exact: a market cap
//! of exactly the configured floor must compare equal, which `f64`
//! cannot guarantee after unit conversion.

use crate::error::{CoreError, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rupees in one crore (10^7).
pub const RUPEES_PER_CRORE: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Monetary amount in crores of rupees.
///
/// Wraps `Decimal` to keep market caps from being mixed with
/// percentages in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Crores(pub Decimal);

impl Crores {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Convert an amount in rupees to crores.
    #[inline]
    pub fn from_rupees(rupees: Decimal) -> Self {
        Self(rupees / RUPEES_PER_CRORE)
    }

    /// Convert a raw rupee amount as reported by JSON APIs.
    ///
    /// Fails for NaN and infinities.
    pub fn from_rupees_f64(rupees: f64) -> Result<Self> {
        Decimal::from_f64(rupees)
            .map(Self::from_rupees)
            .ok_or_else(|| CoreError::InvalidMetric(format!("market cap {rupees}")))
    }

    /// Two-decimal rendering used in the output file.
    pub fn to_fixed(&self) -> String {
        format!("{:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Crores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Crores {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Crores {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Percentage value (15 means 15%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(pub Decimal);

impl Percent {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Build from a ratio (0.18 -> 18%).
    #[inline]
    pub fn from_ratio(ratio: Decimal) -> Self {
        Self(ratio * Decimal::ONE_HUNDRED)
    }

    /// Build from a ratio reported as `f64`.
    ///
    /// Fails for NaN and infinities.
    pub fn from_ratio_f64(ratio: f64) -> Result<Self> {
        Decimal::from_f64(ratio)
            .map(Self::from_ratio)
            .ok_or_else(|| CoreError::InvalidMetric(format!("ratio {ratio}")))
    }

    /// Rendering used in the output file, e.g. `18.25%`.
    pub fn to_fixed(&self) -> String {
        format!("{:.2}%", self.0.round_dp(2))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for Percent {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim_end_matches('%').parse()?))
    }
}

impl From<Decimal> for Percent {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}
