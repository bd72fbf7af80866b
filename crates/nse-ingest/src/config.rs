//! Ingest configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Screen thresholds and batching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Market cap floor in crores (inclusive). Default: 1000.
    #[serde(default = "default_min_market_cap_cr")]
    pub min_market_cap_cr: Decimal,
    /// ROE floor in percent (inclusive). Default: 15.
    #[serde(default = "default_min_roe_pct")]
    pub min_roe_pct: Decimal,
    /// Listings evaluated per run. Default: 50.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause after each listing (ms), to stay polite with the
    /// upstream sources. Default: 2000.
    #[serde(default = "default_record_delay_ms")]
    pub record_delay_ms: u64,
}

fn default_min_market_cap_cr() -> Decimal {
    Decimal::from(1000)
}

fn default_min_roe_pct() -> Decimal {
    Decimal::from(15)
}

fn default_batch_size() -> usize {
    50
}

fn default_record_delay_ms() -> u64 {
    2000
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_market_cap_cr: default_min_market_cap_cr(),
            min_roe_pct: default_min_roe_pct(),
            batch_size: default_batch_size(),
            record_delay_ms: default_record_delay_ms(),
        }
    }
}

impl IngestConfig {
    /// Validate configuration values.
    ///
    /// Returns Err if:
    /// - batch_size == 0
    /// - min_market_cap_cr < 0
    /// - min_roe_pct < 0
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.min_market_cap_cr.is_sign_negative() {
            return Err(format!(
                "min_market_cap_cr ({}) must be non-negative",
                self.min_market_cap_cr
            ));
        }

        if self.min_roe_pct.is_sign_negative() {
            return Err(format!(
                "min_roe_pct ({}) must be non-negative",
                self.min_roe_pct
            ));
        }

        Ok(())
    }

    /// Inter-record delay.
    pub fn record_delay(&self) -> Duration {
        Duration::from_millis(self.record_delay_ms)
    }
}
