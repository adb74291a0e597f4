//! Command-line interface definitions.
//!
//! One invocation runs one full crawl pass to completion and exits. All
//! options have defaults matching the built-in configuration; a seed file
//! is only needed to crawl a different set of publications.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the crawler.
///
/// # Examples
///
/// ```sh
/// # Crawl the built-in newspaper table into ./news.csv
/// news_harvest
///
/// # Custom seeds, faster politeness delay, more workers
/// news_harvest --config seeds.yaml --delay-secs 1 --workers 16 -o /data/news.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to a YAML seed file (defaults to the built-in newspaper table)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output CSV path
    #[arg(short, long, default_value = "news.csv")]
    pub out: PathBuf,

    /// Minimum seconds between requests to the same domain
    #[arg(long, default_value_t = 2)]
    pub delay_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Maximum concurrent fetches across all domains
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    /// Outbound User-Agent header
    #[arg(long, env = "NEWS_HARVEST_USER_AGENT")]
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["news_harvest"]);

        assert!(cli.config.is_none());
        assert_eq!(cli.out, PathBuf::from("news.csv"));
        assert_eq!(cli.delay_secs, 2);
        assert_eq!(cli.timeout_secs, 30);
        assert_eq!(cli.workers, 8);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "news_harvest",
            "--config",
            "seeds.yaml",
            "-o",
            "/tmp/out.csv",
            "--delay-secs",
            "0",
            "--workers",
            "16",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("seeds.yaml")));
        assert_eq!(cli.out, PathBuf::from("/tmp/out.csv"));
        assert_eq!(cli.delay_secs, 0);
        assert_eq!(cli.workers, 16);
    }
}
