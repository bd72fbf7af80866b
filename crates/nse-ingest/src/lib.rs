//! Checkpointed batch ingester.
//!
//! Each run reads the resume cursor, evaluates one fixed-size window of
//! the listing file against the market cap / ROE screen, looks up a
//! profit figure for every match, appends the results, and persists the
//! next cursor. The listing file is treated as circular across runs.

pub mod config;
pub mod error;
pub mod filter;
pub mod ingester;
pub mod progress;
pub mod window;

pub use config::IngestConfig;
pub use error::{IngestError, IngestResult};
pub use filter::{ScreenFilter, Verdict};
pub use ingester::{BatchIngester, BatchOutcome, BatchStats, RunReport};
pub use progress::{ProgressTracker, RunProgress, RunStatus};
pub use window::batch_window;
