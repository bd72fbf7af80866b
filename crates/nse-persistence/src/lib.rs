//! Storage for the NSE screener.
//!
//! Three stores back an ingest run:
//! - the listing file (read-only CSV of codes and symbols)
//! - the cursor (a single integer, absent means 0)
//! - the result file (append-only CSV with a one-time header)

pub mod csv;
pub mod cursor;
pub mod error;
pub mod listing;
pub mod writer;

pub use cursor::{CursorStore, FileCursorStore, MemoryCursorStore};
pub use error::{PersistenceError, PersistenceResult};
pub use listing::{parse_listings, CsvListingSource, ListingSource};
pub use writer::{CsvResultWriter, MemoryResultSink, ResultSink, RESULT_HEADER};
