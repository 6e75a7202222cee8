//! HTTP retrieval with exponential backoff.
//!
//! - [`FetchAsync`]: Core trait for retrieving a document by URL
//! - [`HttpFetcher`]: `reqwest` client with the configured user agent and timeout
//! - [`RetryFetch`]: Decorator that adds retry logic to any `FetchAsync`
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use rand::{Rng, rng};
use reqwest::Client;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

use super::FetchError;
use crate::config::FetchSettings;

/// Retrieve a document body by URL.
pub trait FetchAsync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Plain HTTP GET via a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(StdDuration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl FetchAsync for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Wrapper that retries a [`FetchAsync`] with exponential backoff and jitter.
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: FetchAsync,
{
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FetchAsync for RetryFetch<T>
where
    T: FetchAsync,
{
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    let total_ms = total_t0.elapsed().as_millis();

                    if attempt > self.max_retries || !e.is_retryable() {
                        error!(attempt, max = self.max_retries, elapsed_ms_total = total_ms, error = %e, "fetch() giving up");
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(attempt, max = self.max_retries, elapsed_ms_total = total_ms, ?delay, error = %e, "fetch() attempt failed; backing off");
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails a fixed number of times, then succeeds.
    struct Flaky {
        failures_left: Cell<usize>,
        calls: Cell<usize>,
        error_status: u16,
    }

    impl Flaky {
        fn new(failures: usize, error_status: u16) -> Self {
            Self {
                failures_left: Cell::new(failures),
                calls: Cell::new(0),
                error_status,
            }
        }
    }

    impl FetchAsync for Flaky {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            self.calls.set(self.calls.get() + 1);
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(FetchError::Status(self.error_status));
            }
            Ok("body".to_string())
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let retry = RetryFetch::new(Flaky::new(2, 503), 3, StdDuration::from_millis(10));
        assert_eq!(retry.fetch("https://example.com").await.unwrap(), "body");
        assert_eq!(retry.inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let retry = RetryFetch::new(Flaky::new(10, 503), 2, StdDuration::from_millis(10));
        assert!(retry.fetch("https://example.com").await.is_err());
        assert_eq!(retry.inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let retry = RetryFetch::new(Flaky::new(10, 404), 5, StdDuration::from_millis(10));
        assert!(matches!(
            retry.fetch("https://example.com").await,
            Err(FetchError::Status(404))
        ));
        assert_eq!(retry.inner.calls.get(), 1);
    }

    #[test]
    fn test_backoff_is_capped() {
        let retry = RetryFetch::new(Flaky::new(0, 500), 5, StdDuration::from_secs(1));
        let d = retry.backoff(10);
        assert!(d >= StdDuration::from_secs(30));
        assert!(d <= StdDuration::from_millis(30_250));
    }
}
