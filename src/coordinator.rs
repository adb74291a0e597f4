//! The crawl coordinator: a single deterministic pass over the configured
//! seeds.
//!
//! The run moves through four phases and never returns to an earlier one:
//!
//! 1. **Seeding**: enqueue every configured section page into the frontier
//! 2. **Discovering**: fetch each seed page and enqueue its outbound links,
//!    tagged with the seed's publication and section
//! 3. **Fetching**: fetch each discovered candidate, attempt extraction,
//!    and append successful records to the sink
//! 4. **Done**: report totals
//!
//! Per-candidate failures (fetch errors, pages that are not articles) are
//! counted and dropped; they never abort the run. Only sink write errors
//! are fatal mid-run. Cancellation stops new permits from being granted;
//! in-flight fetches drain naturally and the run reports what it completed.

use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::extract::{discover_links, extract_article};
use crate::fetcher::Fetcher;
use crate::frontier::Frontier;
use crate::models::{ArticleRecord, CrawlCandidate, FetchOutcome};
use crate::scheduler::{Scheduler, domain_of};
use crate::sink::CsvSink;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Totals reported when a run reaches `Done`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlStats {
    /// Seed pages fetched and mined for links.
    pub seeds_fetched: usize,
    /// Seed pages whose fetch failed; each contributes zero candidates.
    pub seeds_failed: usize,
    /// Candidates admitted to the frontier during discovery.
    pub candidates_discovered: usize,
    /// Records appended to the sink.
    pub records_written: usize,
    /// Candidate fetches that failed (timeout, connection, non-2xx).
    pub fetch_failures: usize,
    /// Candidates fetched fine but not plausible articles. Expected and
    /// routine.
    pub extraction_misses: usize,
    /// Work items abandoned because cancellation was signalled before their
    /// permit was granted.
    pub skipped: usize,
}

enum SeedOutcome {
    Fetched { admitted: usize },
    Failed,
    Skipped,
}

enum CandidateOutcome {
    Written,
    FetchFailed,
    Miss,
    Skipped,
}

/// Drives one crawl run over a frontier, a politeness scheduler, a fetcher,
/// and the CSV sink.
pub struct Coordinator {
    config: CrawlConfig,
    fetcher: Fetcher,
    scheduler: Arc<Scheduler>,
    frontier: Frontier,
    sink: CsvSink,
}

impl Coordinator {
    pub fn new(config: CrawlConfig, sink: CsvSink) -> Result<Self, CrawlError> {
        let fetcher = Fetcher::new(&config.user_agent, config.fetch_timeout)?;
        let scheduler = Arc::new(Scheduler::new(config.min_delay));
        Ok(Self {
            config,
            fetcher,
            scheduler,
            frontier: Frontier::new(),
            sink,
        })
    }

    /// Handle for signalling cancellation from outside the run.
    pub fn scheduler(&self) -> Arc<Scheduler> {
        Arc::clone(&self.scheduler)
    }

    /// Run the crawl to completion and return the totals.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&self) -> Result<CrawlStats, CrawlError> {
        let mut stats = CrawlStats::default();

        // Seeding
        for seed in &self.config.seeds {
            self.frontier.enqueue(CrawlCandidate {
                url: seed.url.clone(),
                publication: seed.publication.clone(),
                section: seed.section.clone(),
                discovered_from: String::new(),
            });
        }
        let seeds = self.frontier.drain();
        info!(seeds = seeds.len(), "Seeding complete");

        // Discovering
        let outcomes: Vec<SeedOutcome> = stream::iter(seeds)
            .map(|seed| self.discover_one(seed))
            .buffer_unordered(self.config.workers)
            .collect()
            .await;
        for outcome in outcomes {
            match outcome {
                SeedOutcome::Fetched { admitted } => {
                    stats.seeds_fetched += 1;
                    stats.candidates_discovered += admitted;
                }
                SeedOutcome::Failed => stats.seeds_failed += 1,
                SeedOutcome::Skipped => stats.skipped += 1,
            }
        }
        info!(
            fetched = stats.seeds_fetched,
            failed = stats.seeds_failed,
            candidates = stats.candidates_discovered,
            "Discovery complete"
        );

        // Fetching
        let candidates = self.frontier.drain();
        let outcomes: Vec<Result<CandidateOutcome, CrawlError>> = stream::iter(candidates)
            .map(|candidate| self.fetch_one(candidate))
            .buffer_unordered(self.config.workers)
            .collect()
            .await;
        for outcome in outcomes {
            match outcome? {
                CandidateOutcome::Written => stats.records_written += 1,
                CandidateOutcome::FetchFailed => stats.fetch_failures += 1,
                CandidateOutcome::Miss => stats.extraction_misses += 1,
                CandidateOutcome::Skipped => stats.skipped += 1,
            }
        }

        // Done
        info!(
            seeds_fetched = stats.seeds_fetched,
            seeds_failed = stats.seeds_failed,
            candidates_discovered = stats.candidates_discovered,
            records_written = stats.records_written,
            fetch_failures = stats.fetch_failures,
            extraction_misses = stats.extraction_misses,
            skipped = stats.skipped,
            "Crawl complete"
        );
        Ok(stats)
    }

    /// Fetch one seed page and enqueue its outbound links.
    async fn discover_one(&self, seed: CrawlCandidate) -> SeedOutcome {
        let Some(domain) = domain_of(&seed.url) else {
            warn!(url = %seed.url, "Seed URL has no host");
            return SeedOutcome::Failed;
        };
        let Some(permit) = self.scheduler.acquire(&domain).await else {
            return SeedOutcome::Skipped;
        };
        let outcome = self.fetcher.fetch(&seed.url).await;
        drop(permit);

        match outcome {
            FetchOutcome::Success { body, .. } => {
                // The frontier admitted this URL, so it parses.
                let base = Url::parse(&seed.url).unwrap();
                let links = discover_links(&body, &base);
                let found = links.len();
                let mut admitted = 0;
                for link in links {
                    if self.frontier.enqueue(CrawlCandidate {
                        url: link,
                        publication: seed.publication.clone(),
                        section: seed.section.clone(),
                        discovered_from: seed.url.clone(),
                    }) {
                        admitted += 1;
                    }
                }
                info!(
                    seed = %seed.url,
                    publication = %seed.publication,
                    section = %seed.section,
                    found,
                    admitted,
                    "Seed page mined"
                );
                SeedOutcome::Fetched { admitted }
            }
            FetchOutcome::Failure(failure) => {
                warn!(seed = %seed.url, %failure, "Seed fetch failed; contributing zero candidates");
                SeedOutcome::Failed
            }
        }
    }

    /// Fetch one candidate, attempt extraction, and append on success.
    async fn fetch_one(&self, candidate: CrawlCandidate) -> Result<CandidateOutcome, CrawlError> {
        let Some(domain) = domain_of(&candidate.url) else {
            warn!(url = %candidate.url, "Candidate URL has no host");
            return Ok(CandidateOutcome::FetchFailed);
        };
        let Some(permit) = self.scheduler.acquire(&domain).await else {
            return Ok(CandidateOutcome::Skipped);
        };
        let outcome = self.fetcher.fetch(&candidate.url).await;
        drop(permit);

        let body = match outcome {
            FetchOutcome::Success { body, .. } => body,
            FetchOutcome::Failure(failure) => {
                warn!(url = %candidate.url, %failure, "Candidate fetch failed");
                return Ok(CandidateOutcome::FetchFailed);
            }
        };
        let Some(extracted) = extract_article(&body) else {
            debug!(url = %candidate.url, "Not an article; skipping");
            return Ok(CandidateOutcome::Miss);
        };
        let record = ArticleRecord {
            title: extracted.title,
            text: extracted.text,
            url: candidate.url,
            date: extracted.date,
            newspaper: candidate.publication,
            section: candidate.section,
            authors: extracted.authors,
        };
        self.sink.append(&record)?;
        info!(url = %record.url, title = %record.title, "Article recorded");
        Ok(CandidateOutcome::Written)
    }
}
