//! Application wiring.
//!
//! Builds the HTTP providers and file stores from `AppConfig` and drives
//! a single ingest run (or a dry run) through `BatchIngester`.

use crate::config::AppConfig;
use crate::error::AppResult;
use nse_ingest::{BatchIngester, BatchOutcome, RunReport};
use nse_persistence::{CsvListingSource, CsvResultWriter, FileCursorStore};
use nse_provider::{JsonProfitClient, YahooMetricsClient};
use std::sync::Arc;
use tracing::{info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    ingester: BatchIngester<YahooMetricsClient, JsonProfitClient>,
    listings: CsvListingSource,
    cursor: FileCursorStore,
    writer: CsvResultWriter,
}

impl Application {
    /// Create a new application.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let metrics = Arc::new(YahooMetricsClient::new(&config.metrics_source)?);
        let profit = Arc::new(JsonProfitClient::new(&config.profit_source)?);
        let ingester = BatchIngester::new(config.ingest.clone(), metrics, profit)?;

        let listings = CsvListingSource::new(
            &config.listings.path,
            config.listings.code_column.clone(),
            config.listings.symbol_column.clone(),
        );
        let cursor = FileCursorStore::new(&config.persistence.cursor_path);
        let writer = CsvResultWriter::new(&config.persistence.output_path);

        info!(
            listings = %listings.path().display(),
            cursor = %cursor.path().display(),
            output = %writer.path().display(),
            min_market_cap_cr = %config.ingest.min_market_cap_cr,
            min_roe_pct = %config.ingest.min_roe_pct,
            batch_size = config.ingest.batch_size,
            "Application initialized"
        );

        Ok(Self {
            config,
            ingester,
            listings,
            cursor,
            writer,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run one checkpointed batch.
    ///
    /// The metrics textfile is written whether or not the run succeeds.
    pub async fn run(&self) -> AppResult<RunReport> {
        let result = self
            .ingester
            .run(&self.listings, &self.cursor, &self.writer)
            .await;

        let progress = self.ingester.progress().snapshot();
        info!(
            status = ?progress.status,
            processed = progress.processed,
            total = progress.total,
            percent = progress.percent(),
            "Run progress"
        );

        self.export_metrics();

        let report = result?;
        info!(
            run_id = %report.run_id,
            window = ?report.window,
            processed = report.stats.processed,
            matched = report.stats.matched,
            written = report.results_written,
            metrics_not_found = report.stats.metrics_not_found,
            metrics_errors = report.stats.metrics_errors,
            profit_missing = report.stats.profit_missing,
            profit_errors = report.stats.profit_errors,
            next_cursor = report.next_cursor,
            duration_ms = report.duration_ms,
            "Run report"
        );
        Ok(report)
    }

    /// Screen the next window and log the matches without touching the
    /// output file or the cursor.
    pub async fn dry_run(&self) -> AppResult<BatchOutcome> {
        let outcome = self.ingester.dry_run(&self.listings, &self.cursor).await?;

        for record in &outcome.results {
            info!(
                code = %record.code,
                symbol = %record.symbol,
                roe = %record.roe.to_fixed(),
                market_cap_cr = %record.market_cap.to_fixed(),
                profit = %record.profit,
                "Dry run match"
            );
        }
        info!(
            window = ?outcome.window,
            matched = outcome.stats.matched,
            emitted = outcome.stats.emitted,
            next_cursor = outcome.next_cursor,
            "Dry run complete, nothing written"
        );
        Ok(outcome)
    }

    fn export_metrics(&self) {
        let Some(path) = &self.config.telemetry.metrics_textfile else {
            return;
        };
        // Export failure never fails the run.
        if let Err(e) = nse_telemetry::write_textfile(path) {
            warn!(path = %path.display(), error = %e, "Failed to write metrics textfile");
        }
    }
}
