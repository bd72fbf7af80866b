//! Listing file reader.
//!
//! The listing file is a CSV with a header row. The code and symbol
//! columns are located by header name, so exchange downloads (e.g. the
//! BSE equity list with `Security Code` / `Security Id`) can be used
//! unmodified. Row order defines batch slicing.

use crate::csv::parse_rows;
use crate::error::{PersistenceError, PersistenceResult};
use nse_core::Listing;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Source of the ordered listing list.
pub trait ListingSource {
    /// Load every listing, in file order.
    fn load_listings(&self) -> PersistenceResult<Vec<Listing>>;
}

impl ListingSource for Vec<Listing> {
    fn load_listings(&self) -> PersistenceResult<Vec<Listing>> {
        Ok(self.clone())
    }
}

/// Parse listing CSV text.
///
/// Header names are matched case-insensitively after trimming. Rows
/// that are too short or have an empty code or symbol are skipped with
/// a warning; a missing column or an unterminated quote is an error.
pub fn parse_listings(
    text: &str,
    code_column: &str,
    symbol_column: &str,
    origin: &str,
) -> PersistenceResult<Vec<Listing>> {
    let mut rows = parse_rows(text)
        .map_err(|e| PersistenceError::InvalidListing(format!("{origin}: {e}")))?
        .into_iter();

    let header = rows
        .next()
        .ok_or_else(|| PersistenceError::InvalidListing(format!("{origin} has no header row")))?;

    let find = |column: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column.trim()))
            .ok_or_else(|| PersistenceError::MissingColumn {
                path: origin.to_string(),
                column: column.to_string(),
            })
    };
    let code_idx = find(code_column)?;
    let symbol_idx = find(symbol_column)?;

    let mut listings = Vec::new();
    let mut skipped = 0usize;

    // Line numbers are 1-based and count the header.
    for (line, row) in rows.enumerate().map(|(i, r)| (i + 2, r)) {
        let (Some(code), Some(symbol)) = (row.get(code_idx), row.get(symbol_idx)) else {
            warn!(origin, line, "Skipping short listing row");
            skipped += 1;
            continue;
        };
        match Listing::new(code.as_str(), symbol.as_str()) {
            Ok(listing) => listings.push(listing),
            Err(e) => {
                warn!(origin, line, error = %e, "Skipping listing row");
                skipped += 1;
            }
        }
    }

    debug!(origin, count = listings.len(), skipped, "Parsed listings");
    Ok(listings)
}

/// Listing source backed by a CSV file.
#[derive(Debug, Clone)]
pub struct CsvListingSource {
    path: PathBuf,
    code_column: String,
    symbol_column: String,
}

impl CsvListingSource {
    /// Create a source reading `path` with the given header names.
    pub fn new(
        path: impl AsRef<Path>,
        code_column: impl Into<String>,
        symbol_column: impl Into<String>,
    ) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            code_column: code_column.into(),
            symbol_column: symbol_column.into(),
        }
    }

    /// Path of the listing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ListingSource for CsvListingSource {
    fn load_listings(&self) -> PersistenceResult<Vec<Listing>> {
        let origin = self.path.display().to_string();
        let text = std::fs::read_to_string(&self.path)?;
        let listings = parse_listings(&text, &self.code_column, &self.symbol_column, &origin)?;
        info!(path = %origin, count = listings.len(), "Loaded listing file");
        Ok(listings)
    }
}
