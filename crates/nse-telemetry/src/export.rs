//! Prometheus text exposition for one-shot runs.
//!
//! A run exits before any scraper could reach it, so the registry is
//! written to a file picked up by node_exporter's textfile collector.

use crate::error::{TelemetryError, TelemetryResult};
use prometheus::{Encoder, TextEncoder};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Render the default registry in text exposition format.
pub fn render_metrics() -> TelemetryResult<String> {
    let encoder = TextEncoder::new();
    let families = prometheus::gather();
    let mut buf = Vec::new();
    encoder
        .encode(&families, &mut buf)
        .map_err(|e| TelemetryError::Metrics(format!("Failed to encode metrics: {e}")))?;
    String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
}

/// Write the default registry to `path`.
///
/// Writes `<path>.tmp` first and renames it, so the collector never
/// reads a partial file.
pub fn write_textfile(path: &Path) -> TelemetryResult<()> {
    let body = render_metrics()?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;

    debug!(path = %path.display(), "Wrote metrics textfile");
    Ok(())
}
