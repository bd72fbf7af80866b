//! Prometheus metrics and structured logging for the NSE screener.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Prometheus counters for ingest runs and lookups
//! - Textfile export, since a run is a one-shot process with no scrape endpoint

pub mod error;
pub mod export;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use export::{render_metrics, write_textfile};
pub use logging::init_logging;
pub use metrics::Metrics;
