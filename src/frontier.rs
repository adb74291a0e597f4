//! URL frontier: the deduplicated FIFO queue of pending crawl work.
//!
//! The frontier owns the run's seen-set. A URL is admitted at most once per
//! run, in normalized form, so every record written downstream has a unique
//! URL. Duplicates are routine (section pages link to the same stories many
//! times over) and are discarded silently rather than treated as errors.

use crate::models::CrawlCandidate;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use tracing::trace;
use url::Url;

/// Normalize a URL for dedup: lowercase scheme and host (done by the parser),
/// strip the fragment, and collapse a trailing slash on non-root paths, so
/// `http://x.com/a` and `http://x.com/a/#top` dedup identically.
///
/// Returns `None` for anything that is not an absolute http(s) URL with a
/// host: pseudo-links (`javascript:`, `mailto:`), relative paths, and
/// malformed strings are rejected here rather than counted as duplicates.
pub fn normalize_url(raw: &str) -> Option<String> {
    let mut url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str()?;
    url.set_fragment(None);
    // Trim the path component only; a trailing slash inside the query
    // string is part of the URL and must survive.
    if url.path() != "/" && url.path().ends_with('/') {
        let trimmed = url.path().trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }
    Some(url.to_string())
}

#[derive(Debug, Default)]
struct FrontierState {
    seen: HashSet<String>,
    queue: VecDeque<CrawlCandidate>,
}

/// Deduplicated FIFO work queue, shared between concurrent workers.
///
/// The interior mutex is the dedup correctness lock: two workers discovering
/// the same URL concurrently cannot both admit it.
#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a candidate iff its normalized URL has not been seen this run.
    ///
    /// Returns `true` when the candidate was queued. Returns `false` for
    /// duplicates and for URLs that fail normalization; both are expected
    /// and discarded without error. The queued candidate carries the
    /// normalized URL.
    pub fn enqueue(&self, candidate: CrawlCandidate) -> bool {
        let Some(normalized) = normalize_url(&candidate.url) else {
            trace!(url = %candidate.url, "Rejected unusable link");
            return false;
        };
        let mut state = self.state.lock().unwrap();
        if !state.seen.insert(normalized.clone()) {
            trace!(url = %normalized, "Duplicate link discarded");
            return false;
        }
        state.queue.push_back(CrawlCandidate {
            url: normalized,
            ..candidate
        });
        true
    }

    /// Drain all currently queued candidates in insertion (FIFO) order.
    pub fn drain(&self) -> Vec<CrawlCandidate> {
        let mut state = self.state.lock().unwrap();
        state.queue.drain(..).collect()
    }

    /// Number of candidates currently queued.
    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }
}
