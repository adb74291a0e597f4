//! # News Harvest
//!
//! A crawl-and-extract pipeline for a fixed set of news sites. The crawler
//! fetches configured section pages, discovers article candidate links one
//! hop out, fetches each unseen candidate, and attempts structured article
//! extraction (title, body text, publish date, authors). Successful records
//! are appended to a CSV file for downstream analysis.
//!
//! ## Architecture
//!
//! The pipeline runs as a single deterministic pass:
//! 1. **Seeding**: load configured (publication, section, URL) triples into
//!    the [`frontier::Frontier`]
//! 2. **Discovering**: fetch each section page and enqueue its outbound links
//! 3. **Fetching**: fetch each candidate and attempt article extraction
//! 4. **Done**: report totals and flush the CSV sink
//!
//! Outbound requests are gated by the [`scheduler::Scheduler`], which allows
//! at most one in-flight request per domain and enforces a minimum delay
//! between successive requests to the same domain.

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod frontier;
pub mod models;
pub mod scheduler;
pub mod sink;
