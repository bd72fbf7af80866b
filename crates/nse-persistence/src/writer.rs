//! Append-only CSV result writer.
//!
//! Uses append mode so earlier runs are never rewritten. The header is
//! written only when the file is new or empty.

use crate::csv::write_row;
use crate::error::PersistenceResult;
use nse_core::ResultRecord;
use parking_lot::Mutex;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output columns, in order.
pub const RESULT_HEADER: [&str; 6] = ["Date", "Code", "Symbol", "ROE", "Market Cap (Cr)", "Profit"];

/// Destination for screened results.
pub trait ResultSink {
    /// Append records in order. Returns the number written.
    fn append(&self, records: &[ResultRecord]) -> PersistenceResult<usize>;
}

/// CSV file sink.
#[derive(Debug, Clone)]
pub struct CsvResultWriter {
    path: PathBuf,
}

impl CsvResultWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn needs_header(&self) -> PersistenceResult<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }
}

impl ResultSink for CsvResultWriter {
    fn append(&self, records: &[ResultRecord]) -> PersistenceResult<usize> {
        // Nothing to write: leave a missing file missing.
        if records.is_empty() {
            return Ok(0);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let write_header = self.needs_header()?;

        // Open in append mode - won't truncate existing data
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        if write_header {
            info!(path = %self.path.display(), "Creating result file");
            write_row(&mut writer, &RESULT_HEADER)?;
        }

        for record in records {
            write_row(&mut writer, &record.to_row())?;
        }

        writer.flush()?;
        writer.get_ref().sync_all()?;

        debug!(
            path = %self.path.display(),
            records = records.len(),
            "Appended results"
        );
        Ok(records.len())
    }
}

/// In-memory sink that keeps every appended record.
#[derive(Debug, Default)]
pub struct MemoryResultSink {
    records: Mutex<Vec<ResultRecord>>,
}

impl MemoryResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records appended so far.
    pub fn records(&self) -> Vec<ResultRecord> {
        self.records.lock().clone()
    }
}

impl ResultSink for MemoryResultSink {
    fn append(&self, records: &[ResultRecord]) -> PersistenceResult<usize> {
        self.records.lock().extend_from_slice(records);
        Ok(records.len())
    }
}
