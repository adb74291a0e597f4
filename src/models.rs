//! Data models for the crawl pipeline.
//!
//! This module defines the structures that flow between components:
//! - [`SeedTarget`]: a configured section page to start discovery from
//! - [`CrawlCandidate`]: a discovered URL awaiting fetch-and-extract
//! - [`FetchOutcome`] / [`FetchFailure`]: the classified result of one GET
//! - [`ArticleRecord`]: a successfully extracted article, the unit written
//!   to the CSV sink

use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

/// A configured starting point for link discovery: one section page of one
/// publication. Created from static configuration at startup and never
/// treated as an article itself.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedTarget {
    /// Publication name, e.g. `"TheHerald"`.
    pub publication: String,
    /// Section name within the publication, e.g. `"business"`.
    pub section: String,
    /// Absolute URL of the section page.
    pub url: String,
}

/// A discovered URL awaiting a fetch-and-extract attempt.
///
/// Candidates carry the publication/section tag of the seed page they were
/// discovered on. Owned by the frontier until dispatched; never mutated
/// after creation.
#[derive(Debug, Clone)]
pub struct CrawlCandidate {
    /// Normalized absolute URL of the candidate page.
    pub url: String,
    /// Publication tag inherited from the originating seed.
    pub publication: String,
    /// Section tag inherited from the originating seed.
    pub section: String,
    /// URL of the page this candidate was discovered on.
    pub discovered_from: String,
}

/// The classified result of a single fetch. Transient: consumed immediately
/// by the caller and never stored.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 2xx response with a body.
    Success { body: String, status: u16 },
    /// Anything else. Non-fatal; the candidate is dropped.
    Failure(FetchFailure),
}

/// Why a fetch failed. Failures are counted per category in the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request exceeded the configured timeout.
    Timeout,
    /// Connection-level error (DNS, refused, reset, TLS).
    Connection,
    /// The server answered with a non-2xx status.
    Http(u16),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Timeout => write!(f, "timeout"),
            FetchFailure::Connection => write!(f, "connection error"),
            FetchFailure::Http(status) => write!(f, "http status {status}"),
        }
    }
}

/// A successfully extracted article: the terminal, durable artifact of the
/// pipeline. Immutable once created; appended exactly once to the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    /// Article headline.
    pub title: String,
    /// Main body text.
    pub text: String,
    /// Normalized URL the article was fetched from. Unique within a run.
    pub url: String,
    /// Publish date, when one could be located.
    pub date: Option<NaiveDate>,
    /// Publication tag inherited from the seed that discovered this page.
    pub newspaper: String,
    /// Section tag inherited from the seed that discovered this page.
    pub section: String,
    /// Author names in page order. May be empty.
    pub authors: Vec<String>,
}
