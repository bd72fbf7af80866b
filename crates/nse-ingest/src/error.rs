//! Ingest error types.
//!
//! Per-listing lookup failures are not errors; they surface in
//! `BatchStats`. Everything here aborts the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] nse_persistence::PersistenceError),
}

pub type IngestResult<T> = Result<T, IngestError>;
