//! Persistence error types.
//!
//! All of these are fatal for an ingest run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid cursor value in {path}: {value:?}")]
    InvalidCursor { path: String, value: String },

    #[error("Listing file {path} has no column named {column:?}")]
    MissingColumn { path: String, column: String },

    #[error("Invalid listing file: {0}")]
    InvalidListing(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
