//! Provider error types.
//!
//! Only construction can fail with these; individual lookups report
//! failures through `Lookup::Error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
