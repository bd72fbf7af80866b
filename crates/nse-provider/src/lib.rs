//! External lookups for the NSE screener.
//!
//! Two providers feed an ingest run:
//! - `MetricsProvider`: market cap and ROE by symbol (Yahoo quoteSummary)
//! - `ProfitProvider`: profit figure by primary code (JSON endpoint)
//!
//! Every lookup resolves to a `Lookup` value; providers never return
//! errors for per-listing failures.

pub mod client;
pub mod config;
pub mod error;
pub mod profit;
pub mod provider;
pub mod yahoo;

pub use config::{MetricsSourceConfig, ProfitSourceConfig};
pub use error::{ProviderError, ProviderResult};
pub use profit::JsonProfitClient;
pub use provider::{
    BoxFuture, MetricsProvider, ProfitProvider, StaticMetricsProvider, StaticProfitProvider,
};
pub use yahoo::YahooMetricsClient;
