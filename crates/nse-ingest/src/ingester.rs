//! Batch ingester.
//!
//! One run:
//! 1. load the listing file and the resume cursor
//! 2. screen the window `[start, end)` one listing at a time
//! 3. append matches to the result sink
//! 4. persist `end` as the next cursor
//!
//! Results are appended before the cursor is saved. A crash between the
//! two repeats the window on the next run (duplicate rows) instead of
//! skipping it.

use crate::config::IngestConfig;
use crate::error::{IngestError, IngestResult};
use crate::filter::{ScreenFilter, Verdict};
use crate::progress::ProgressTracker;
use crate::window::batch_window;
use chrono::{DateTime, Utc};
use nse_core::{Listing, Lookup, MetricsSnapshot, ResultRecord};
use nse_persistence::{CursorStore, ListingSource, ResultSink};
use nse_provider::{MetricsProvider, ProfitProvider};
use nse_telemetry::Metrics;
use serde::Serialize;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Per-window counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Listings in the window.
    pub processed: usize,
    /// Listings that passed the screen.
    pub matched: usize,
    pub metrics_not_found: usize,
    pub metrics_errors: usize,
    /// Matches dropped for an absent or blank profit.
    pub profit_missing: usize,
    pub profit_errors: usize,
    /// Result records produced.
    pub emitted: usize,
}

/// Result of screening one window.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub window: Range<usize>,
    /// Matches with a profit figure, in listing order.
    pub results: Vec<ResultRecord>,
    pub next_cursor: usize,
    pub stats: BatchStats,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub listings_total: usize,
    /// Cursor as loaded (0 when absent).
    pub cursor_before: usize,
    pub window: Range<usize>,
    pub next_cursor: usize,
    pub results_written: usize,
    pub stats: BatchStats,
    pub duration_ms: u64,
}

/// Screens listings in checkpointed batches.
pub struct BatchIngester<M, P> {
    config: IngestConfig,
    filter: ScreenFilter,
    metrics: Arc<M>,
    profit: Arc<P>,
    progress: ProgressTracker,
}

impl<M, P> BatchIngester<M, P>
where
    M: MetricsProvider,
    P: ProfitProvider,
{
    /// Create an ingester. Fails on an invalid configuration.
    pub fn new(config: IngestConfig, metrics: Arc<M>, profit: Arc<P>) -> IngestResult<Self> {
        config.validate().map_err(IngestError::InvalidConfig)?;
        let filter = ScreenFilter::from_config(&config);
        Ok(Self {
            config,
            filter,
            metrics,
            profit,
            progress: ProgressTracker::new(),
        })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn filter(&self) -> &ScreenFilter {
        &self.filter
    }

    /// Handle to the shared progress state.
    pub fn progress(&self) -> ProgressTracker {
        self.progress.clone()
    }

    /// Screen the window starting at `cursor`.
    ///
    /// Lookup failures are counted and skipped; this never fails.
    pub async fn process_batch(&self, listings: &[Listing], cursor: usize) -> BatchOutcome {
        let window = batch_window(cursor, listings.len(), self.config.batch_size);
        if cursor >= listings.len() && !listings.is_empty() {
            info!(
                cursor,
                listings = listings.len(),
                "Cursor at end of listing file, wrapping to start"
            );
        }

        let delay = self.config.record_delay();
        let mut stats = BatchStats::default();
        let mut results = Vec::new();

        self.progress.begin(window.len());

        for listing in &listings[window.clone()] {
            stats.processed += 1;
            Metrics::record_processed();

            if let Some(record) = self.screen_listing(listing, &mut stats).await {
                results.push(record);
            }

            self.progress.advance();

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        stats.emitted = results.len();

        BatchOutcome {
            next_cursor: window.end,
            window,
            results,
            stats,
        }
    }

    async fn screen_listing(
        &self,
        listing: &Listing,
        stats: &mut BatchStats,
    ) -> Option<ResultRecord> {
        let lookup = self.metrics.fetch_metrics(&listing.symbol).await;

        let metrics: MetricsSnapshot = match self.filter.evaluate(&lookup) {
            Verdict::Match(m) => m,
            Verdict::BelowThreshold(m) => {
                debug!(
                    listing = %listing,
                    market_cap = %m.market_cap,
                    roe = %m.roe,
                    "Below threshold"
                );
                return None;
            }
            Verdict::Unavailable => {
                match &lookup {
                    Lookup::Error(reason) => {
                        stats.metrics_errors += 1;
                        warn!(listing = %listing, %reason, "Metrics lookup failed");
                    }
                    _ => {
                        stats.metrics_not_found += 1;
                        debug!(listing = %listing, "No metrics for symbol");
                    }
                }
                Metrics::lookup_failure("metrics", lookup.kind());
                return None;
            }
        };

        stats.matched += 1;
        Metrics::record_matched();

        match self.profit.fetch_profit(&listing.code).await {
            Lookup::Found(profit) if !profit.trim().is_empty() => {
                info!(
                    listing = %listing,
                    market_cap = %metrics.market_cap,
                    roe = %metrics.roe,
                    profit = %profit.trim(),
                    "Match"
                );
                Some(ResultRecord::new(listing, metrics, profit.trim()))
            }
            Lookup::Found(_) | Lookup::NotFound => {
                stats.profit_missing += 1;
                debug!(listing = %listing, "Match dropped: no profit figure");
                Metrics::lookup_failure("profit", "not_found");
                None
            }
            Lookup::Error(reason) => {
                stats.profit_errors += 1;
                warn!(listing = %listing, %reason, "Profit lookup failed");
                Metrics::lookup_failure("profit", "error");
                None
            }
        }
    }

    /// Execute one checkpointed run.
    ///
    /// Any persistence failure aborts the run; the cursor is only saved
    /// after the results are durably appended.
    pub async fn run<L, C, S>(
        &self,
        listing_source: &L,
        cursor_store: &C,
        sink: &S,
    ) -> IngestResult<RunReport>
    where
        L: ListingSource + ?Sized,
        C: CursorStore + ?Sized,
        S: ResultSink + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let span = info_span!("ingest_run", %run_id);

        let result = self
            .run_inner(run_id, listing_source, cursor_store, sink)
            .instrument(span)
            .await;

        if let Err(e) = &result {
            self.progress.fail();
            Metrics::run_failed();
            warn!(%run_id, error = %e, "Ingest run aborted, cursor not advanced");
        }
        result
    }

    /// Screen the next window without writing results or the cursor.
    pub async fn dry_run<L, C>(
        &self,
        listing_source: &L,
        cursor_store: &C,
    ) -> IngestResult<BatchOutcome>
    where
        L: ListingSource + ?Sized,
        C: CursorStore + ?Sized,
    {
        let listings = listing_source.load_listings()?;
        let cursor = cursor_store.load()?.unwrap_or(0);
        info!(listings = listings.len(), cursor, "Dry run");

        let outcome = self.process_batch(&listings, cursor).await;
        self.progress.finish();
        Ok(outcome)
    }

    async fn run_inner<L, C, S>(
        &self,
        run_id: Uuid,
        listing_source: &L,
        cursor_store: &C,
        sink: &S,
    ) -> IngestResult<RunReport>
    where
        L: ListingSource + ?Sized,
        C: CursorStore + ?Sized,
        S: ResultSink + ?Sized,
    {
        let started = Instant::now();
        let started_at = Utc::now();

        let listings = listing_source.load_listings()?;
        Metrics::listings_total(listings.len());

        let cursor = cursor_store.load()?.unwrap_or(0);
        info!(
            listings = listings.len(),
            cursor,
            batch_size = self.config.batch_size,
            "Starting ingest run"
        );

        let outcome = self.process_batch(&listings, cursor).await;

        let written = sink.append(&outcome.results)?;
        Metrics::results_emitted(written);

        cursor_store.save(outcome.next_cursor)?;
        Metrics::cursor_position(outcome.next_cursor);

        self.progress.finish();

        let elapsed = started.elapsed();
        Metrics::run_completed(elapsed.as_secs_f64(), Utc::now().timestamp() as f64);

        info!(
            window_start = outcome.window.start,
            window_end = outcome.window.end,
            matched = outcome.stats.matched,
            written,
            next_cursor = outcome.next_cursor,
            elapsed_ms = elapsed.as_millis() as u64,
            "Ingest run complete"
        );

        Ok(RunReport {
            run_id,
            started_at,
            listings_total: listings.len(),
            cursor_before: cursor,
            window: outcome.window,
            next_cursor: outcome.next_cursor,
            results_written: written,
            stats: outcome.stats,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RunStatus;
    use nse_core::{Crores, Percent};
    use nse_persistence::{MemoryCursorStore, MemoryResultSink, PersistenceError, PersistenceResult};
    use nse_provider::{StaticMetricsProvider, StaticProfitProvider};
    use rust_decimal_macros::dec;
    use std::io;
    use std::time::Duration;

    fn config(batch_size: usize) -> IngestConfig {
        IngestConfig {
            batch_size,
            record_delay_ms: 0,
            ..Default::default()
        }
    }

    fn listings(n: usize) -> Vec<Listing> {
        (0..n)
            .map(|i| Listing::new(format!("{}", 500000 + i), format!("SYM{i}")).unwrap())
            .collect()
    }

    fn strong() -> MetricsSnapshot {
        MetricsSnapshot::new(Crores::new(dec!(25000)), Percent::new(dec!(21.4)))
    }

    fn weak() -> MetricsSnapshot {
        MetricsSnapshot::new(Crores::new(dec!(300)), Percent::new(dec!(8)))
    }

    struct FailingSink;

    impl ResultSink for FailingSink {
        fn append(&self, _records: &[ResultRecord]) -> PersistenceResult<usize> {
            Err(PersistenceError::Io(io::Error::new(
                io::ErrorKind::Other,
                "disk full",
            )))
        }
    }

    struct ReadOnlyCursor(usize);

    impl CursorStore for ReadOnlyCursor {
        fn load(&self) -> PersistenceResult<Option<usize>> {
            Ok(Some(self.0))
        }

        fn save(&self, _cursor: usize) -> PersistenceResult<()> {
            Err(PersistenceError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }
    }

    #[tokio::test]
    async fn test_matches_with_profit_are_emitted() {
        let metrics = StaticMetricsProvider::new()
            .with_metrics("SYM0", strong())
            .with_metrics("SYM1", weak())
            .with_metrics("SYM2", strong());
        let profit = StaticProfitProvider::new()
            .with_profit("500000", "1,204.5")
            .with_profit("500002", "88");
        let ingester =
            BatchIngester::new(config(10), Arc::new(metrics), Arc::new(profit)).unwrap();

        let outcome = ingester.process_batch(&listings(3), 0).await;

        assert_eq!(outcome.window, 0..3);
        assert_eq!(outcome.next_cursor, 3);
        let symbols: Vec<_> = outcome.results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["SYM0", "SYM2"]);
        assert_eq!(outcome.results[0].profit, "1,204.5");
        assert_eq!(outcome.results[0].market_cap, Crores::new(dec!(25000)));
        assert_eq!(outcome.stats.processed, 3);
        assert_eq!(outcome.stats.matched, 2);
        assert_eq!(outcome.stats.emitted, 2);
    }

    #[tokio::test]
    async fn test_profit_only_fetched_for_matches() {
        let metrics = Arc::new(
            StaticMetricsProvider::new()
                .with_metrics("SYM0", weak())
                .with_metrics("SYM1", strong()),
        );
        let profit = Arc::new(StaticProfitProvider::new().with_profit("500001", "10"));
        let ingester = BatchIngester::new(config(10), metrics.clone(), profit.clone()).unwrap();

        ingester.process_batch(&listings(2), 0).await;

        assert_eq!(metrics.calls(), vec!["SYM0", "SYM1"]);
        assert_eq!(profit.calls(), vec!["500001"]);
    }

    #[tokio::test]
    async fn test_lookup_failures_are_skipped() {
        let metrics = StaticMetricsProvider::new()
            .with("SYM0", Lookup::Error("HTTP 500".to_string()))
            // SYM1 unknown: NotFound
            .with_metrics("SYM2", strong())
            .with_metrics("SYM3", strong())
            .with_metrics("SYM4", strong())
            .with_metrics("SYM5", strong());
        let profit = StaticProfitProvider::new()
            .with("500002", Lookup::Error("timeout".to_string()))
            .with_profit("500003", "   ")
            // 500004 unknown: NotFound
            .with_profit("500005", "42");
        let ingester =
            BatchIngester::new(config(10), Arc::new(metrics), Arc::new(profit)).unwrap();

        let outcome = ingester.process_batch(&listings(6), 0).await;

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].code, "500005");
        assert_eq!(
            outcome.stats,
            BatchStats {
                processed: 6,
                matched: 4,
                metrics_not_found: 1,
                metrics_errors: 1,
                profit_missing: 2,
                profit_errors: 1,
                emitted: 1,
            }
        );
        assert_eq!(outcome.next_cursor, 6, "failures still advance the cursor");
    }

    #[tokio::test]
    async fn test_run_advances_and_wraps() {
        let all = listings(5);
        let metrics = StaticMetricsProvider::new().with_metrics("SYM4", strong());
        let profit = StaticProfitProvider::new().with_profit("500004", "7");
        let ingester =
            BatchIngester::new(config(2), Arc::new(metrics), Arc::new(profit)).unwrap();
        let cursor = MemoryCursorStore::new();
        let sink = MemoryResultSink::new();

        let mut seen = Vec::new();
        for _ in 0..4 {
            let report = ingester.run(&all, &cursor, &sink).await.unwrap();
            seen.push((report.window.clone(), report.next_cursor));
        }

        assert_eq!(
            seen,
            vec![(0..2, 2), (2..4, 4), (4..5, 5), (0..2, 2)]
        );
        assert_eq!(cursor.get(), Some(2));
        assert_eq!(sink.records().len(), 1);
        assert_eq!(ingester.progress().snapshot().status, RunStatus::Done);
    }

    #[tokio::test]
    async fn test_empty_listing_file() {
        let ingester = BatchIngester::new(
            config(50),
            Arc::new(StaticMetricsProvider::new()),
            Arc::new(StaticProfitProvider::new()),
        )
        .unwrap();
        let cursor = MemoryCursorStore::with_cursor(30);
        let sink = MemoryResultSink::new();

        let report = ingester
            .run(&Vec::<Listing>::new(), &cursor, &sink)
            .await
            .unwrap();

        assert_eq!(report.window, 0..0);
        assert_eq!(report.results_written, 0);
        assert_eq!(cursor.get(), Some(0));
    }

    #[tokio::test]
    async fn test_sink_failure_keeps_cursor() {
        let metrics = StaticMetricsProvider::new().with_metrics("SYM0", strong());
        let profit = StaticProfitProvider::new().with_profit("500000", "1");
        let ingester =
            BatchIngester::new(config(5), Arc::new(metrics), Arc::new(profit)).unwrap();
        let cursor = MemoryCursorStore::with_cursor(0);

        let err = ingester
            .run(&listings(3), &cursor, &FailingSink)
            .await
            .unwrap_err();

        assert!(matches!(err, IngestError::Persistence(PersistenceError::Io(_))));
        assert_eq!(cursor.get(), Some(0));
        assert_eq!(ingester.progress().snapshot().status, RunStatus::Failed);
    }

    #[tokio::test]
    async fn test_cursor_save_failure_is_fatal() {
        let ingester = BatchIngester::new(
            config(5),
            Arc::new(StaticMetricsProvider::new()),
            Arc::new(StaticProfitProvider::new()),
        )
        .unwrap();

        let result = ingester
            .run(&listings(3), &ReadOnlyCursor(1), &MemoryResultSink::new())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let metrics = StaticMetricsProvider::new().with_metrics("SYM1", strong());
        let profit = StaticProfitProvider::new().with_profit("500001", "3");
        let ingester =
            BatchIngester::new(config(2), Arc::new(metrics), Arc::new(profit)).unwrap();
        let cursor = MemoryCursorStore::with_cursor(1);

        let outcome = ingester.dry_run(&listings(4), &cursor).await.unwrap();

        assert_eq!(outcome.window, 1..3);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(cursor.get(), Some(1));
    }

    #[tokio::test]
    async fn test_delay_after_each_record() {
        let cfg = IngestConfig {
            batch_size: 3,
            record_delay_ms: 10,
            ..Default::default()
        };
        let ingester = BatchIngester::new(
            cfg,
            Arc::new(StaticMetricsProvider::new()),
            Arc::new(StaticProfitProvider::new()),
        )
        .unwrap();

        let start = Instant::now();
        ingester.process_batch(&listings(3), 0).await;
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = BatchIngester::new(
            config(0),
            Arc::new(StaticMetricsProvider::new()),
            Arc::new(StaticProfitProvider::new()),
        );
        assert!(matches!(result, Err(IngestError::InvalidConfig(_))));
    }
}
