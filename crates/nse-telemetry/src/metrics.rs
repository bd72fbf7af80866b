//! Prometheus metrics for ingest runs.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on
//! duplicate metric names, a static configuration error that should
//! crash on first use rather than be ignored.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram, register_int_counter,
    register_int_gauge, CounterVec, Gauge, Histogram, IntCounter, IntGauge,
};

/// Listings evaluated.
pub static RECORDS_PROCESSED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "nse_records_processed_total",
        "Total listings evaluated against the screen"
    )
    .unwrap()
});

/// Listings whose metrics passed the screen.
pub static MATCHES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "nse_matches_total",
        "Total listings that passed the market cap and ROE screen"
    )
    .unwrap()
});

/// Result rows appended to the output file.
pub static RESULTS_EMITTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "nse_results_emitted_total",
        "Total result rows appended to the output store"
    )
    .unwrap()
});

/// Lookups that did not produce a value.
/// Labels: provider (metrics/profit), kind (not_found/error)
pub static LOOKUP_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "nse_lookup_failures_total",
        "Total external lookups that produced no value",
        &["provider", "kind"]
    )
    .unwrap()
});

/// Cursor persisted at the end of the last run.
pub static CURSOR_POSITION: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "nse_cursor_position",
        "Resume cursor persisted by the last run"
    )
    .unwrap()
});

/// Length of the listing file seen by the last run.
pub static LISTINGS_TOTAL: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("nse_listings_total", "Number of listings in the listing file").unwrap()
});

/// Wall time of one run.
pub static RUN_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "nse_run_duration_seconds",
        "Ingest run duration in seconds",
        vec![1.0, 5.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0]
    )
    .unwrap()
});

/// Unix time of the last successful run.
pub static LAST_SUCCESS_TIMESTAMP: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "nse_last_success_timestamp_seconds",
        "Unix timestamp of the last successful ingest run"
    )
    .unwrap()
});

/// Runs aborted by a fatal error.
pub static RUNS_FAILED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("nse_runs_failed_total", "Total ingest runs aborted").unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record one listing evaluated.
    pub fn record_processed() {
        RECORDS_PROCESSED_TOTAL.inc();
    }

    /// Record one listing passing the screen.
    pub fn record_matched() {
        MATCHES_TOTAL.inc();
    }

    /// Record rows appended to the output store.
    pub fn results_emitted(count: usize) {
        RESULTS_EMITTED_TOTAL.inc_by(count as u64);
    }

    /// Record a lookup without a value.
    pub fn lookup_failure(provider: &str, kind: &str) {
        LOOKUP_FAILURES_TOTAL
            .with_label_values(&[provider, kind])
            .inc();
    }

    /// Set the persisted cursor.
    pub fn cursor_position(cursor: usize) {
        CURSOR_POSITION.set(cursor as i64);
    }

    /// Set the listing file length.
    pub fn listings_total(count: usize) {
        LISTINGS_TOTAL.set(count as i64);
    }

    /// Record a completed run.
    pub fn run_completed(duration_secs: f64, unix_ts: f64) {
        RUN_DURATION_SECONDS.observe(duration_secs);
        LAST_SUCCESS_TIMESTAMP.set(unix_ts);
    }

    /// Record an aborted run.
    pub fn run_failed() {
        RUNS_FAILED_TOTAL.inc();
    }
}
