//! NSE screener - Entry Point
//!
//! Runs one checkpointed batch and exits. Invoke from cron or a systemd
//! timer to sweep the listing file over successive runs.

use anyhow::Result;
use clap::Parser;
use nse_screener::{AppConfig, Application};
use std::path::Path;
use tracing::{info, warn};

/// Checkpointed NSE listing screener
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via NSE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Override ingest.batch_size for this run
    #[arg(long)]
    batch_size: Option<usize>,

    /// Screen the next window and log matches without writing results or the cursor
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config path: CLI arg > NSE_CONFIG env var > default
    // An explicitly named file must exist.
    let (config_path, explicit) = AppConfig::resolve_path(args.config);
    let mut config = AppConfig::load(&config_path, explicit)?;
    if let Some(batch_size) = args.batch_size {
        config.ingest.batch_size = batch_size;
        config.validate()?;
    }

    nse_telemetry::init_logging(&config.telemetry.log_level)?;

    info!("Starting NSE screener v{}", env!("CARGO_PKG_VERSION"));
    if Path::new(&config_path).exists() {
        info!(config_path = %config_path, "Configuration loaded");
    } else {
        warn!(config_path = %config_path, "Config file not found, using defaults");
    }

    let app = Application::new(config)?;

    if args.dry_run {
        app.dry_run().await?;
    } else {
        app.run().await?;
    }

    Ok(())
}
