//! # News Harvest
//!
//! CLI entry point: run one crawl pass over the configured news sections
//! and append extracted article records to a CSV file.
//!
//! ## Usage
//!
//! ```sh
//! news_harvest --config seeds.yaml -o news.csv --delay-secs 2 --workers 8
//! ```
//!
//! Exit code is 0 on completion, including runs with per-page failures;
//! non-zero only for fatal configuration or output-sink errors.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

use news_harvest::cli::Cli;
use news_harvest::config::CrawlConfig;
use news_harvest::coordinator::Coordinator;
use news_harvest::sink::CsvSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Fatal before any network activity: bad config or unwritable output.
    let config = CrawlConfig::from_cli(&args)?;
    let sink = CsvSink::create(&config.output_path)?;

    let output_path = config.output_path.clone();
    let coordinator = Coordinator::new(config, sink)?;

    // Ctrl-C stops new permits; in-flight fetches drain naturally.
    let scheduler = coordinator.scheduler();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Shutdown signal received; finishing in-flight fetches");
            scheduler.cancel();
        }
    });

    let stats = coordinator.run().await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        records_written = stats.records_written,
        output = %output_path.display(),
        "Execution complete"
    );

    Ok(())
}
