//! NSE screener.
//!
//! One invocation runs one checkpointed batch:
//! - load the listing file and resume cursor
//! - screen the next window on market cap and ROE
//! - look up profit for each match
//! - append results to the output CSV and advance the cursor
//!
//! Scheduling is left to the host (cron, systemd timers).

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
