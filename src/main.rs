//! Semafor main entry point

use anyhow::Context;
use clap::Parser;
use semafor::config::load_config_with_hash;
use semafor::harvest::{print_report, run_harvest};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Semafor: an incremental news article harvester
///
/// Walks the configured topic listing pages, skips every link already
/// recorded in the store, and persists the metadata of each new article.
#[derive(Parser, Debug)]
#[command(name = "semafor")]
#[command(version)]
#[command(about = "Incremental news article harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let report = run_harvest(config).await.context("harvest run failed")?;

    print_report(&report);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("semafor=info,warn"),
            1 => EnvFilter::new("semafor=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
