//! Application configuration.

use crate::error::{AppError, AppResult};
use config::{Config, Environment, File, FileFormat};
use nse_ingest::IngestConfig;
use nse_provider::{MetricsSourceConfig, ProfitSourceConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "NSE_CONFIG";

/// Prefix for per-key overrides, e.g. `NSE__INGEST__BATCH_SIZE=25`.
const ENV_PREFIX: &str = "NSE";

/// Listing file location and header names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingsConfig {
    pub path: PathBuf,
    /// Column holding the primary code (profit lookups).
    pub code_column: String,
    /// Column holding the ticker (metrics lookups).
    pub symbol_column: String,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/listings.csv"),
            code_column: "Security Code".to_string(),
            symbol_column: "Security Id".to_string(),
        }
    }
}

/// Cursor and result file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub cursor_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            cursor_path: PathBuf::from("data/cursor.txt"),
            output_path: PathBuf::from("data/nse_data.csv"),
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Log level (overridden by RUST_LOG).
    pub log_level: String,
    /// Prometheus textfile written after each run. None disables export.
    pub metrics_textfile: Option<PathBuf>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_textfile: None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Screen thresholds and batching.
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub listings: ListingsConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Market metrics endpoint.
    #[serde(default)]
    pub metrics_source: MetricsSourceConfig,
    /// Profit endpoint.
    #[serde(default)]
    pub profit_source: ProfitSourceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Resolve the config path: explicit argument > `NSE_CONFIG` > default.
    ///
    /// Returns the path and whether it was named explicitly.
    pub fn resolve_path(explicit: Option<String>) -> (String, bool) {
        match explicit.or_else(|| std::env::var(CONFIG_PATH_ENV).ok()) {
            Some(path) => (path, true),
            None => (DEFAULT_CONFIG_PATH.to_string(), false),
        }
    }

    /// Load `path` and overlay `NSE__*` environment variables.
    ///
    /// When `required` is false a missing file is not an error; defaults
    /// and the environment still apply.
    pub fn load(path: &str, required: bool) -> AppResult<Self> {
        let settings = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(format!("Failed to load config {path}: {e}")))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-section invariants.
    pub fn validate(&self) -> AppResult<()> {
        self.ingest.validate().map_err(AppError::Config)?;

        if self.listings.code_column.trim().is_empty()
            || self.listings.symbol_column.trim().is_empty()
        {
            return Err(AppError::Config(
                "listings.code_column and listings.symbol_column must be set".to_string(),
            ));
        }

        if self.persistence.cursor_path == self.persistence.output_path {
            return Err(AppError::Config(
                "persistence.cursor_path and persistence.output_path must differ".to_string(),
            ));
        }

        Ok(())
    }
}
