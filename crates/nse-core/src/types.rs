//! Listing, metrics, and result types.

use crate::decimal::{Crores, Percent};
use crate::error::{CoreError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the listing file.
///
/// `code` is the primary exchange code (BSE security code) used for
/// profit lookups; `symbol` is the ticker used for market metrics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Listing {
    pub code: String,
    pub symbol: String,
}

impl Listing {
    /// Create a listing, trimming surrounding whitespace.
    ///
    /// Fails if either identifier is empty.
    pub fn new(code: impl Into<String>, symbol: impl Into<String>) -> Result<Self> {
        let code = code.into().trim().to_string();
        let symbol = symbol.into().trim().to_string();

        if code.is_empty() {
            return Err(CoreError::InvalidListing(format!(
                "empty code for symbol '{symbol}'"
            )));
        }
        if symbol.is_empty() {
            return Err(CoreError::InvalidListing(format!(
                "empty symbol for code '{code}'"
            )));
        }

        Ok(Self { code, symbol })
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.code, self.symbol)
    }
}

/// Market metrics for one listing.
///
/// Ephemeral: used for the filter decision and copied into the
/// result row, never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Market capitalisation in crores.
    pub market_cap: Crores,
    /// Return on equity in percent.
    pub roe: Percent,
}

impl MetricsSnapshot {
    pub fn new(market_cap: Crores, roe: Percent) -> Self {
        Self { market_cap, roe }
    }
}

/// A screened listing, appended to the output store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// When the record was produced.
    pub recorded_at: DateTime<Local>,
    pub code: String,
    pub symbol: String,
    pub roe: Percent,
    pub market_cap: Crores,
    /// Profit figure as reported by the profit source (free text).
    pub profit: String,
}

impl ResultRecord {
    /// Build a record stamped with the current local time.
    pub fn new(listing: &Listing, metrics: MetricsSnapshot, profit: impl Into<String>) -> Self {
        Self::at(Local::now(), listing, metrics, profit)
    }

    /// Build a record with an explicit timestamp.
    pub fn at(
        recorded_at: DateTime<Local>,
        listing: &Listing,
        metrics: MetricsSnapshot,
        profit: impl Into<String>,
    ) -> Self {
        Self {
            recorded_at,
            code: listing.code.clone(),
            symbol: listing.symbol.clone(),
            roe: metrics.roe,
            market_cap: metrics.market_cap,
            profit: profit.into(),
        }
    }

    /// Column values in output order.
    ///
    /// Matches the header `Date,Code,Symbol,ROE,Market Cap (Cr),Profit`.
    pub fn to_row(&self) -> [String; 6] {
        [
            self.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.code.clone(),
            self.symbol.clone(),
            self.roe.to_fixed(),
            self.market_cap.to_fixed(),
            self.profit.clone(),
        ]
    }
}
