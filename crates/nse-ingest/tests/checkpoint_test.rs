//! Checkpointed run integration tests.
//!
//! Drives the ingester against real files:
//! - listing CSV on disk
//! - plain-text cursor file
//! - append-only result CSV

use nse_core::{Crores, Lookup, MetricsSnapshot, Percent};
use nse_ingest::{BatchIngester, IngestConfig, IngestError};
use nse_persistence::{
    CsvListingSource, CsvResultWriter, CursorStore, FileCursorStore, PersistenceError,
};
use nse_provider::{StaticMetricsProvider, StaticProfitProvider};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write_listing_file(path: &Path, n: usize) {
    let mut text = String::from("Security Code,Security Id,Security Name\n");
    for i in 0..n {
        text.push_str(&format!("{},TICK{i},\"Company {i}, Ltd\"\n", 100000 + i));
    }
    fs::write(path, text).unwrap();
}

fn snapshot(cap: Decimal, roe: Decimal) -> MetricsSnapshot {
    MetricsSnapshot::new(Crores::new(cap), Percent::new(roe))
}

fn config(batch_size: usize) -> IngestConfig {
    IngestConfig {
        batch_size,
        record_delay_ms: 0,
        ..Default::default()
    }
}

fn result_rows(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// 120 listings, batch of 50: cursors 0 -> 50 -> 100 -> 120 -> 50.
#[tokio::test]
async fn test_multi_run_cursor_sequence() {
    let dir = TempDir::new().unwrap();
    let listing_path = dir.path().join("listings.csv");
    write_listing_file(&listing_path, 120);

    // Every tenth listing passes the screen.
    let mut metrics = StaticMetricsProvider::new();
    let mut profit = StaticProfitProvider::new();
    for i in (0..120).step_by(10) {
        metrics = metrics.with_metrics(format!("TICK{i}"), snapshot(dec!(5000), dec!(20)));
        profit = profit.with_profit(format!("{}", 100000 + i), format!("{}", i * 3));
    }

    let ingester = BatchIngester::new(config(50), Arc::new(metrics), Arc::new(profit)).unwrap();
    let source = CsvListingSource::new(&listing_path, "Security Code", "Security Id");
    let cursor = FileCursorStore::new(dir.path().join("state").join("cursor.txt"));
    let writer = CsvResultWriter::new(dir.path().join("out").join("results.csv"));

    let mut cursors = vec![cursor.load().unwrap().unwrap_or(0)];
    let mut written = Vec::new();
    for _ in 0..4 {
        let report = ingester.run(&source, &cursor, &writer).await.unwrap();
        assert_eq!(report.listings_total, 120);
        cursors.push(cursor.load().unwrap().unwrap());
        written.push(report.results_written);
    }

    assert_eq!(cursors, vec![0, 50, 100, 120, 50]);
    assert_eq!(written, vec![5, 5, 2, 5]);

    let rows = result_rows(writer.path());
    assert_eq!(rows[0], "Date,Code,Symbol,ROE,Market Cap (Cr),Profit");
    assert_eq!(rows.len(), 1 + 17);
    assert_eq!(rows.iter().filter(|r| r.starts_with("Date,")).count(), 1);
    assert!(rows[1].ends_with(",100000,TICK0,20.00%,5000.00,0"));
}

#[tokio::test]
async fn test_threshold_boundary_inclusive() {
    let dir = TempDir::new().unwrap();
    let listing_path = dir.path().join("listings.csv");
    write_listing_file(&listing_path, 4);

    let metrics = StaticMetricsProvider::new()
        .with_metrics("TICK0", snapshot(dec!(1000), dec!(15)))
        .with_metrics("TICK1", snapshot(dec!(999.99), dec!(15)))
        .with_metrics("TICK2", snapshot(dec!(1000), dec!(14.99)))
        .with_metrics("TICK3", snapshot(dec!(1000.01), dec!(15.01)));
    let profit = StaticProfitProvider::new()
        .with_profit("100000", "10")
        .with_profit("100001", "11")
        .with_profit("100002", "12")
        .with_profit("100003", "13");

    let ingester = BatchIngester::new(config(50), Arc::new(metrics), Arc::new(profit)).unwrap();
    let writer = CsvResultWriter::new(dir.path().join("results.csv"));
    let report = ingester
        .run(
            &CsvListingSource::new(&listing_path, "security code", "security id"),
            &FileCursorStore::new(dir.path().join("cursor.txt")),
            &writer,
        )
        .await
        .unwrap();

    assert_eq!(report.stats.matched, 2);
    let rows = result_rows(writer.path());
    assert_eq!(rows.len(), 3);
    assert!(rows[1].contains(",TICK0,"));
    assert!(rows[2].contains(",TICK3,"));
}

#[tokio::test]
async fn test_failed_lookups_still_advance() {
    let dir = TempDir::new().unwrap();
    let listing_path = dir.path().join("listings.csv");
    write_listing_file(&listing_path, 3);

    let metrics = StaticMetricsProvider::new()
        .with("TICK0", Lookup::Error("connection reset".to_string()))
        .with_metrics("TICK1", snapshot(dec!(9000), dec!(30)));
    let profit = StaticProfitProvider::new().with("100001", Lookup::Error("502".to_string()));

    let ingester = BatchIngester::new(config(50), Arc::new(metrics), Arc::new(profit)).unwrap();
    let cursor = FileCursorStore::new(dir.path().join("cursor.txt"));
    let writer = CsvResultWriter::new(dir.path().join("results.csv"));

    let report = ingester
        .run(
            &CsvListingSource::new(&listing_path, "Security Code", "Security Id"),
            &cursor,
            &writer,
        )
        .await
        .unwrap();

    assert_eq!(report.results_written, 0);
    assert_eq!(report.stats.metrics_errors, 1);
    assert_eq!(report.stats.profit_errors, 1);
    assert_eq!(cursor.load().unwrap(), Some(3));
    assert!(!writer.path().exists(), "no header without results");
}

#[tokio::test]
async fn test_missing_listing_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let cursor = FileCursorStore::new(dir.path().join("cursor.txt"));
    cursor.save(7).unwrap();

    let ingester = BatchIngester::new(
        config(50),
        Arc::new(StaticMetricsProvider::new()),
        Arc::new(StaticProfitProvider::new()),
    )
    .unwrap();

    let err = ingester
        .run(
            &CsvListingSource::new(dir.path().join("missing.csv"), "Security Code", "Security Id"),
            &cursor,
            &CsvResultWriter::new(dir.path().join("results.csv")),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Persistence(PersistenceError::Io(_))));
    assert_eq!(cursor.load().unwrap(), Some(7));
}

#[tokio::test]
async fn test_corrupt_cursor_is_fatal() {
    let dir = TempDir::new().unwrap();
    let listing_path = dir.path().join("listings.csv");
    write_listing_file(&listing_path, 3);
    let cursor_path = dir.path().join("cursor.txt");
    fs::write(&cursor_path, "fifty").unwrap();

    let ingester = BatchIngester::new(
        config(50),
        Arc::new(StaticMetricsProvider::new()),
        Arc::new(StaticProfitProvider::new()),
    )
    .unwrap();

    let err = ingester
        .run(
            &CsvListingSource::new(&listing_path, "Security Code", "Security Id"),
            &FileCursorStore::new(&cursor_path),
            &CsvResultWriter::new(dir.path().join("results.csv")),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        IngestError::Persistence(PersistenceError::InvalidCursor { .. })
    ));
    assert_eq!(fs::read_to_string(&cursor_path).unwrap(), "fifty");
}
