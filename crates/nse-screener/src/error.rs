//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(#[from] nse_provider::ProviderError),

    #[error("Ingest error: {0}")]
    Ingest(#[from] nse_ingest::IngestError),
}

pub type AppResult<T> = Result<T, AppError>;
