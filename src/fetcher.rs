//! Single-request HTTP fetching with a fixed identity and bounded timeout.
//!
//! The fetcher performs exactly one GET per call and classifies the outcome;
//! it never retries and never touches frontier or scheduler state. Callers
//! sequence `acquire -> fetch -> release` themselves.

use crate::error::CrawlError;
use crate::models::{FetchFailure, FetchOutcome};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Shared HTTP client wrapper. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a client carrying the configured User-Agent and per-request
    /// timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Perform one GET and classify the result.
    ///
    /// 2xx responses yield [`FetchOutcome::Success`] with the body text;
    /// everything else is a [`FetchFailure`]. Failures here are per-candidate
    /// and never abort the run.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failure(classify(&e)),
        };
        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::Failure(FetchFailure::Http(status.as_u16()));
        }
        match response.text().await {
            Ok(body) => {
                debug!(bytes = body.len(), status = status.as_u16(), "Fetched page");
                FetchOutcome::Success {
                    body,
                    status: status.as_u16(),
                }
            }
            Err(e) => FetchOutcome::Failure(classify(&e)),
        }
    }
}

fn classify(e: &reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else {
        FetchFailure::Connection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher() -> Fetcher {
        Fetcher::new("news_harvest-test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn success_returns_body_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        match test_fetcher().fetch(&format!("{}/page", server.uri())).await {
            FetchOutcome::Success { body, status } => {
                assert_eq!(body, "hello");
                assert_eq!(status, 200);
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_2xx_is_an_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        match test_fetcher().fetch(&format!("{}/gone", server.uri())).await {
            FetchOutcome::Failure(FetchFailure::Http(404)) => {}
            other => panic!("expected 404 failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_a_connection_failure() {
        // Reserved port on localhost with nothing listening.
        match test_fetcher().fetch("http://127.0.0.1:1/page").await {
            FetchOutcome::Failure(FetchFailure::Connection) => {}
            other => panic!("expected connection failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sends_the_configured_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ua"))
            .and(header("user-agent", "news_harvest-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = test_fetcher().fetch(&format!("{}/ua", server.uri())).await;
        assert!(matches!(outcome, FetchOutcome::Success { .. }));
    }
}
