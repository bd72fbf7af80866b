//! Market cap / ROE screen.

use crate::config::IngestConfig;
use nse_core::{Crores, Lookup, MetricsSnapshot, Percent};

/// Outcome of screening one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Both thresholds met.
    Match(MetricsSnapshot),
    /// Metrics available, at least one threshold missed.
    BelowThreshold(MetricsSnapshot),
    /// Metrics lookup gave nothing usable.
    Unavailable,
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match(_))
    }
}

/// Inclusive lower bounds on market cap and ROE.
///
/// Strategy: keep a listing iff
/// - market_cap >= min_market_cap
/// - roe >= min_roe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenFilter {
    min_market_cap: Crores,
    min_roe: Percent,
}

impl ScreenFilter {
    pub fn new(min_market_cap: Crores, min_roe: Percent) -> Self {
        Self {
            min_market_cap,
            min_roe,
        }
    }

    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(
            Crores::new(config.min_market_cap_cr),
            Percent::new(config.min_roe_pct),
        )
    }

    pub fn min_market_cap(&self) -> Crores {
        self.min_market_cap
    }

    pub fn min_roe(&self) -> Percent {
        self.min_roe
    }

    /// Threshold check on known metrics.
    pub fn passes(&self, metrics: &MetricsSnapshot) -> bool {
        metrics.market_cap >= self.min_market_cap && metrics.roe >= self.min_roe
    }

    /// Screen a metrics lookup.
    pub fn evaluate(&self, lookup: &Lookup<MetricsSnapshot>) -> Verdict {
        match lookup.as_found() {
            Some(metrics) if self.passes(metrics) => Verdict::Match(*metrics),
            Some(metrics) => Verdict::BelowThreshold(*metrics),
            None => Verdict::Unavailable,
        }
    }
}

impl Default for ScreenFilter {
    fn default() -> Self {
        Self::from_config(&IngestConfig::default())
    }
}
