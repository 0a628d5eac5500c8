use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::scanner::RetryPolicy;

/// Allowed range for the number of addresses processed concurrently
pub const BATCH_SIZE_RANGE: RangeInclusive<usize> = 1..=10;

/// Allowed range for the per-attempt timeout (milliseconds)
pub const TIMEOUT_MS_RANGE: RangeInclusive<u64> = 1000..=30000;

/// Allowed range for the number of fetch attempts
pub const MAX_RETRIES_RANGE: RangeInclusive<u32> = 1..=5;

/// Main configuration structure for Menu-Scanner
///
/// Every section is optional; a missing file or section falls back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanOptions,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    /// Extra request headers; these override the built-in defaults
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Tunable scan behaviour
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Number of addresses fetched concurrently within one batch
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Hard timeout of a single fetch attempt (milliseconds)
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,

    /// Total number of fetch attempts per address
    #[serde(rename = "retries")]
    pub max_retries: u32,

    /// Base backoff delay between attempts (milliseconds)
    #[serde(rename = "retry-delay")]
    pub retry_delay_ms: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            batch_size: 3,
            timeout_ms: 10_000,
            max_retries: 3,
            retry_delay_ms: 1_000,
        }
    }
}

impl ScanOptions {
    /// Returns a copy with every option forced into its allowed range
    ///
    /// # Example
    ///
    /// ```
    /// use menu_scanner::ScanOptions;
    ///
    /// let options = ScanOptions { batch_size: 50, ..ScanOptions::default() }.clamped();
    /// assert_eq!(options.batch_size, 10);
    /// ```
    pub fn clamped(&self) -> Self {
        Self {
            batch_size: self
                .batch_size
                .clamp(*BATCH_SIZE_RANGE.start(), *BATCH_SIZE_RANGE.end()),
            timeout_ms: self
                .timeout_ms
                .clamp(*TIMEOUT_MS_RANGE.start(), *TIMEOUT_MS_RANGE.end()),
            max_retries: self
                .max_retries
                .clamp(*MAX_RETRIES_RANGE.start(), *MAX_RETRIES_RANGE.end()),
            retry_delay_ms: self.retry_delay_ms,
        }
    }

    /// Builds the retry policy handed to the page fetcher
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_millis(self.timeout_ms),
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the scanner
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scanner
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scanner
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "WPMenuScanner".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/bot".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `Mozilla/5.0 (compatible; Name/Version; +ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}
