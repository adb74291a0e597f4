//! Crawl configuration: seed targets and politeness/fetch/worker knobs.
//!
//! Seeds can come from a YAML file mapping publications to their section
//! pages, or from the built-in newspaper table when no file is given:
//!
//! ```yaml
//! newspapers:
//!   TheHerald:
//!     business: https://www.heraldonline.co.zw/tag/business/
//!     politics: https://www.heraldonline.co.zw/tag/politics/
//! ```
//!
//! All other knobs (identity string, per-domain delay, fetch timeout, worker
//! cap, output path) are plain values supplied by the CLI.

use crate::cli::Cli;
use crate::error::CrawlError;
use crate::models::SeedTarget;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Identity string sent with every outbound request unless overridden.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Built-in seed table: four publications, four sections each.
const DEFAULT_SEEDS: &[(&str, &str, &str)] = &[
    ("TheHerald", "business", "https://www.heraldonline.co.zw/tag/business/"),
    ("TheHerald", "politics", "https://www.heraldonline.co.zw/tag/politics/"),
    ("TheHerald", "arts", "https://www.heraldonline.co.zw/tag/arts/"),
    ("TheHerald", "sports", "https://www.heraldonline.co.zw/tag/sports/"),
    ("cnn", "business", "https://edition.cnn.com/business"),
    ("cnn", "politics", "https://edition.cnn.com/politics"),
    ("cnn", "arts", "https://edition.cnn.com/entertainment"),
    ("cnn", "sports", "https://edition.cnn.com/sport"),
    ("TheZimbabwean", "business", "https://www.thezimbabwean.co/category/business/"),
    ("TheZimbabwean", "politics", "https://www.thezimbabwean.co/category/politics/"),
    ("TheZimbabwean", "arts", "https://www.thezimbabwean.co/category/entertainment/"),
    ("TheZimbabwean", "sports", "https://www.thezimbabwean.co/category/sport/"),
    ("bbc", "business", "https://www.bbc.com/news/business"),
    ("bbc", "politics", "https://www.bbc.com/news/politics"),
    ("bbc", "arts", "https://www.bbc.com/culture"),
    ("bbc", "sports", "https://www.bbc.com/sport"),
];

/// On-disk seed file shape: publication -> section -> URL.
#[derive(Debug, Deserialize)]
struct SeedFile {
    newspapers: BTreeMap<String, BTreeMap<String, String>>,
}

/// Fully resolved configuration for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// One entry per configured (publication, section) pair.
    pub seeds: Vec<SeedTarget>,
    /// Outbound User-Agent header.
    pub user_agent: String,
    /// Minimum delay between successive request starts to the same domain.
    pub min_delay: Duration,
    /// Per-request timeout.
    pub fetch_timeout: Duration,
    /// Cap on concurrent fetches across all domains.
    pub workers: usize,
    /// Path of the CSV output file.
    pub output_path: PathBuf,
}

impl CrawlConfig {
    /// Resolve configuration from parsed CLI arguments.
    ///
    /// Loads the seed file if one was given, otherwise uses the built-in
    /// table, then validates. Fatal errors here abort the run before any
    /// network activity.
    pub fn from_cli(args: &Cli) -> Result<Self, CrawlError> {
        let seeds = match &args.config {
            Some(path) => load_seed_file(path)?,
            None => default_seeds(),
        };
        let config = CrawlConfig {
            seeds,
            user_agent: args
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            min_delay: Duration::from_secs(args.delay_secs),
            fetch_timeout: Duration::from_secs(args.timeout_secs),
            workers: args.workers,
            output_path: args.out.clone(),
        };
        config.validate()?;
        info!(
            seeds = config.seeds.len(),
            workers = config.workers,
            delay_secs = config.min_delay.as_secs(),
            output = %config.output_path.display(),
            "Configuration resolved"
        );
        Ok(config)
    }

    /// Reject configurations the crawl cannot run with.
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.seeds.is_empty() {
            return Err(CrawlError::Config("seed list is empty".to_string()));
        }
        if self.workers == 0 {
            return Err(CrawlError::Config("worker count must be at least 1".to_string()));
        }
        for seed in &self.seeds {
            let url = Url::parse(&seed.url).map_err(|e| {
                CrawlError::Config(format!("seed URL {:?} is malformed: {e}", seed.url))
            })?;
            if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
                return Err(CrawlError::Config(format!(
                    "seed URL {:?} is not an absolute http(s) URL",
                    seed.url
                )));
            }
        }
        Ok(())
    }
}

/// The built-in newspaper table as seed targets.
pub fn default_seeds() -> Vec<SeedTarget> {
    DEFAULT_SEEDS
        .iter()
        .map(|(publication, section, url)| SeedTarget {
            publication: publication.to_string(),
            section: section.to_string(),
            url: url.to_string(),
        })
        .collect()
}

fn load_seed_file(path: &Path) -> Result<Vec<SeedTarget>, CrawlError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CrawlError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SeedFile = serde_yaml::from_str(&raw).map_err(|source| CrawlError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    let seeds = file
        .newspapers
        .into_iter()
        .flat_map(|(publication, sections)| {
            sections.into_iter().map(move |(section, url)| SeedTarget {
                publication: publication.clone(),
                section,
                url,
            })
        })
        .collect();
    Ok(seeds)
}
