//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scanner, including:
//! - Building HTTP clients with the configured user agent and headers
//! - Per-attempt timeouts
//! - Retry with linear backoff
//! - Failure classification

use crate::config::Config;
use crate::scanner::delay::{Delay, TokioDelay};
use crate::{FetchError, FetchFailure, ScanError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Accept header sent with every request unless overridden
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9";

/// Maximum number of redirects followed per attempt
const MAX_REDIRECTS: usize = 10;

/// Timeout, attempt and backoff settings for a single fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Hard limit on one attempt, covering connect, headers and body
    pub timeout: Duration,
    /// Total number of attempts; values below 1 are treated as 1
    pub max_retries: u32,
    /// Base backoff; attempt `k` waits `retry_delay * (k - 1)`
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay inserted before the given 1-indexed attempt
    ///
    /// ```
    /// use menu_scanner::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy { retry_delay: Duration::from_millis(100), ..RetryPolicy::default() };
    /// assert_eq!(policy.backoff_before(1), Duration::ZERO);
    /// assert_eq!(policy.backoff_before(3), Duration::from_millis(200));
    /// ```
    pub fn backoff_before(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt.saturating_sub(1)
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// A successfully fetched HTML document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
    /// Number of attempts used, including the successful one
    pub attempts: u32,
}

/// Builds an HTTP client with proper configuration
///
/// The user agent and `Accept` header are installed as defaults; entries in
/// `config.headers` are applied afterwards and replace them on conflict.
///
/// # Example
///
/// ```no_run
/// use menu_scanner::config::Config;
/// use menu_scanner::scanner::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, ScanError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent.header_value())
            .map_err(|e| ScanError::Header(format!("user agent: {}", e)))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ScanError::Header(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ScanError::Header(format!("{}: {}", name.as_str(), e)))?;
        headers.insert(name, value);
    }

    let client = Client::builder()
        .default_headers(headers)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches front pages with retry and backoff
pub struct PageFetcher<D: Delay = TokioDelay> {
    client: Client,
    delay: D,
}

impl PageFetcher<TokioDelay> {
    /// Creates a fetcher that really sleeps between attempts
    pub fn new(client: Client) -> Self {
        Self::with_delay(client, TokioDelay)
    }

    /// Creates a fetcher from configuration
    pub fn from_config(config: &Config) -> Result<Self, ScanError> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl<D: Delay> PageFetcher<D> {
    /// Creates a fetcher with a custom backoff delay
    pub fn with_delay(client: Client, delay: D) -> Self {
        Self { client, delay }
    }

    /// Fetches an HTML document, retrying failed attempts
    ///
    /// # Retry Logic
    ///
    /// | Condition | Cause |
    /// |-----------|-------|
    /// | Attempt exceeds `policy.timeout` | `Timeout` |
    /// | Connection/DNS/TLS/body error | `TransportFailure` |
    /// | Non-2xx status | `HttpStatus` |
    /// | Content-Type without `text/html` | `UnexpectedContentType` |
    ///
    /// Every cause is retried the same way. Attempt `k > 1` is preceded by a
    /// delay of `retry_delay * (k - 1)`. After the last attempt the error
    /// carries the last cause.
    pub async fn fetch(&self, url: &Url, policy: &RetryPolicy) -> Result<FetchedPage, FetchError> {
        let attempts = policy.attempts();
        let mut last_cause = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                let wait = policy.backoff_before(attempt);
                tracing::debug!("Waiting {:?} before attempt {} for {}", wait, attempt, url);
                self.delay.sleep(wait).await;
            }

            let outcome = match tokio::time::timeout(policy.timeout, self.attempt(url, policy)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(FetchFailure::Timeout(policy.timeout_ms())),
            };

            match outcome {
                Ok((final_url, status_code, body)) => {
                    tracing::debug!(
                        "Fetched {} ({}, {} bytes) on attempt {}/{}",
                        url,
                        status_code,
                        body.len(),
                        attempt,
                        attempts
                    );
                    return Ok(FetchedPage {
                        final_url,
                        status_code,
                        body,
                        attempts: attempt,
                    });
                }
                Err(cause) => {
                    tracing::warn!("Attempt {}/{} for {} failed: {}", attempt, attempts, url, cause);
                    last_cause = Some(cause);
                }
            }
        }

        Err(FetchError {
            url: url.to_string(),
            attempts,
            cause: last_cause
                .unwrap_or_else(|| FetchFailure::TransportFailure("no attempt was made".to_string())),
        })
    }

    /// Performs one request and validates status and content type
    async fn attempt(
        &self,
        url: &Url,
        policy: &RetryPolicy,
    ) -> Result<(String, u16, String), FetchFailure> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(e, policy))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(FetchFailure::UnexpectedContentType(content_type));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| classify_error(e, policy))?;

        Ok((final_url, status.as_u16(), body))
    }
}

/// Maps a reqwest error to a failure cause
fn classify_error(error: reqwest::Error, policy: &RetryPolicy) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout(policy.timeout_ms())
    } else if error.is_connect() {
        FetchFailure::TransportFailure(format!("connection failed: {}", error))
    } else {
        FetchFailure::TransportFailure(error.to_string())
    }
}
