//! Per-domain politeness scheduling.
//!
//! The scheduler gates outbound requests so that at most one request is in
//! flight per domain and successive requests to the same domain start at
//! least `min_delay` apart, while requests to distinct domains proceed
//! independently. This is the one correctness-critical piece of shared
//! state in the crawler: two workers racing for the same domain must
//! serialize, and releasing a permit (success or failure) must always stamp
//! the domain's cooldown.
//!
//! Domain state lives behind a `std::sync::Mutex` that is never held across
//! an await; waiting happens on a [`tokio::sync::Notify`] and plain timer
//! sleeps.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{self, Instant};
use tracing::debug;
use url::Url;

/// Extract the politeness key (lowercased host) from a URL.
pub fn domain_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|host| host.to_ascii_lowercase())
}

#[derive(Debug, Default)]
struct DomainState {
    last_request: Option<Instant>,
    in_flight: bool,
}

enum Wait {
    Ready,
    Cooldown(Duration),
    Busy,
}

/// Domain-keyed politeness gate.
///
/// Created once per run and shared between workers via `Arc`. Domain state
/// is created lazily on first request and never removed within a run.
#[derive(Debug)]
pub struct Scheduler {
    min_delay: Duration,
    domains: Mutex<HashMap<String, DomainState>>,
    released: Notify,
    cancelled: AtomicBool,
}

impl Scheduler {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            domains: Mutex::new(HashMap::new()),
            released: Notify::new(),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Block until the domain is idle and out of cooldown, then reserve it.
    ///
    /// Returns `None` once the run has been cancelled; no new permits are
    /// granted after that point. Dropping the returned [`Permit`] releases
    /// the domain and stamps its cooldown, whether the fetch succeeded or
    /// not.
    pub async fn acquire(&self, domain: &str) -> Option<Permit<'_>> {
        loop {
            if self.cancelled.load(Ordering::Acquire) {
                return None;
            }
            let released = self.released.notified();
            match self.try_reserve(domain) {
                Wait::Ready => {
                    debug!(%domain, "Permit granted");
                    return Some(Permit {
                        scheduler: self,
                        domain: domain.to_string(),
                    });
                }
                Wait::Cooldown(remaining) => time::sleep(remaining).await,
                Wait::Busy => {
                    // Re-check periodically in case a release notification
                    // raced past before this waiter registered.
                    let poll = self.min_delay.max(Duration::from_millis(50));
                    let _ = time::timeout(poll, released).await;
                }
            }
        }
    }

    /// Stop granting permits. In-flight work is unaffected and releases
    /// normally.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.released.notify_waiters();
    }

    /// Whether [`cancel`](Self::cancel) has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn try_reserve(&self, domain: &str) -> Wait {
        let mut domains = self.domains.lock().unwrap();
        let state = domains.entry(domain.to_string()).or_default();
        if state.in_flight {
            return Wait::Busy;
        }
        if let Some(last) = state.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                return Wait::Cooldown(self.min_delay - elapsed);
            }
        }
        state.in_flight = true;
        Wait::Ready
    }

    fn release(&self, domain: &str) {
        {
            let mut domains = self.domains.lock().unwrap();
            if let Some(state) = domains.get_mut(domain) {
                state.in_flight = false;
                state.last_request = Some(Instant::now());
            }
        }
        self.released.notify_waiters();
    }
}

/// Exclusive, rate-limited access to issue one request to one domain.
/// Released on drop.
#[derive(Debug)]
pub struct Permit<'a> {
    scheduler: &'a Scheduler,
    domain: String,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.scheduler.release(&self.domain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn domain_of_lowercases_host() {
        assert_eq!(domain_of("http://X.Test/A").as_deref(), Some("x.test"));
        assert_eq!(domain_of("not a url"), None);
        assert_eq!(domain_of("mailto:news@x.test"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn same_domain_starts_respect_min_delay() {
        let scheduler = Arc::new(Scheduler::new(Duration::from_secs(2)));
        let start = Instant::now();

        let permit = scheduler.acquire("x.test").await.unwrap();
        drop(permit);
        let permit = scheduler.acquire("x.test").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));
        drop(permit);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_domains_do_not_wait_on_each_other() {
        let scheduler = Arc::new(Scheduler::new(Duration::from_secs(2)));
        let start = Instant::now();

        let a = scheduler.acquire("a.test").await.unwrap();
        let b = scheduler.acquire("b.test").await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        drop(a);
        drop(b);
    }

    #[tokio::test(start_paused = true)]
    async fn same_domain_in_flight_serializes() {
        let scheduler = Arc::new(Scheduler::new(Duration::ZERO));
        let permit = scheduler.acquire("x.test").await.unwrap();

        let waiter = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.acquire("x.test").await.is_some() })
        };
        time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(permit);
        assert!(waiter.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn no_new_permits_after_cancel() {
        let scheduler = Arc::new(Scheduler::new(Duration::from_secs(2)));
        let held = scheduler.acquire("x.test").await.unwrap();

        let waiter = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.acquire("x.test").await.is_none() })
        };
        time::sleep(Duration::from_millis(10)).await;

        scheduler.cancel();
        assert!(waiter.await.unwrap());
        assert!(scheduler.acquire("other.test").await.is_none());
        drop(held);
    }

    #[tokio::test(start_paused = true)]
    async fn release_happens_on_drop_even_without_fetch() {
        let scheduler = Arc::new(Scheduler::new(Duration::ZERO));
        {
            let _permit = scheduler.acquire("x.test").await.unwrap();
            // dropped here without any request being made
        }
        assert!(scheduler.acquire("x.test").await.is_some());
    }
}
