//! Error taxonomy for the crawl pipeline.
//!
//! Only two classes of failure are fatal to a run: configuration problems
//! detected before any network activity, and output sink failures (the run
//! aborts rather than silently losing records). Everything that can go wrong
//! with an individual page (fetch failures, pages that are not articles)
//! is represented as a value ([`crate::models::FetchOutcome`], `Option`) and
//! never surfaces as a [`CrawlError`].

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a crawl run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The configuration is unusable (e.g. empty seed list, seed URL
    /// without a host). Detected before any network activity.
    #[error("configuration error: {0}")]
    Config(String),

    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The seed file could not be parsed as YAML.
    #[error("failed to parse seed file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The CSV sink rejected a write. Fatal: the store has become
    /// unwritable mid-run.
    #[error("output sink error: {0}")]
    Sink(#[from] csv::Error),

    /// The output file could not be created or flushed.
    #[error("output file error: {0}")]
    SinkIo(#[from] std::io::Error),
}
