//! Batch orchestration
//!
//! Addresses are split into contiguous batches. Batches run one after
//! another; the addresses of one batch are scanned concurrently, each in its
//! own task, and the whole batch is awaited before the next one starts.
//! Every task writes its result into the slot of its input index, so the
//! report comes out in input order whatever the completion order was.

use crate::config::{Config, ScanOptions};
use crate::output::{ScanReport, SiteResult};
use crate::scanner::delay::Delay;
use crate::scanner::fetcher::{FetchedPage, PageFetcher, RetryPolicy};
use crate::scanner::menu::extract_menu;
use crate::url::normalize_address;
use crate::{FetchError, ScanError};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Anything that can produce an HTML document for a URL
///
/// [`PageFetcher`] is the production implementation; tests substitute
/// canned pages.
pub trait PageSource: Send + Sync + 'static {
    fn fetch_page(
        &self,
        url: &Url,
        policy: &RetryPolicy,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

impl<D: Delay> PageSource for PageFetcher<D> {
    fn fetch_page(
        &self,
        url: &Url,
        policy: &RetryPolicy,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send {
        self.fetch(url, policy)
    }
}

/// Runs scans over lists of addresses
pub struct Scanner<S: PageSource = PageFetcher> {
    source: Arc<S>,
    options: ScanOptions,
}

impl Scanner<PageFetcher> {
    /// Creates a scanner with a real HTTP fetcher built from configuration
    pub fn from_config(config: &Config) -> Result<Self, ScanError> {
        let fetcher = PageFetcher::from_config(config)?;
        Ok(Self::new(fetcher, config.scan.clone()))
    }
}

impl<S: PageSource> Scanner<S> {
    /// Creates a scanner; options are clamped into their allowed ranges
    pub fn new(source: S, options: ScanOptions) -> Self {
        Self {
            source: Arc::new(source),
            options: options.clamped(),
        }
    }

    /// The effective (clamped) options
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scans every address and returns one result per address, in order
    ///
    /// Per-address failures (invalid address, fetch failure, even a
    /// panicking task) are recorded on that address's result and never
    /// affect the others. Dropping the returned future cancels the fetches
    /// of the current batch.
    pub async fn scan<A: AsRef<str>>(&self, addresses: &[A]) -> ScanReport {
        let batch_size = self.options.batch_size;
        let policy = self.options.retry_policy();
        let start_time = Instant::now();

        tracing::info!(
            "Scanning {} address(es) in batches of {}",
            addresses.len(),
            batch_size
        );

        let mut slots: Vec<Option<SiteResult>> = vec![None; addresses.len()];

        for (batch_index, batch) in addresses.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;
            tracing::debug!(
                "Starting batch {} ({} address(es))",
                batch_index + 1,
                batch.len()
            );

            // Dropping the set aborts every task still in flight
            let mut tasks = JoinSet::new();
            for (position, address) in batch.iter().enumerate() {
                let index = offset + position;
                let address = address.as_ref().to_string();
                let source = Arc::clone(&self.source);
                let policy = policy.clone();
                tasks.spawn(async move { (index, scan_site(&*source, &address, &policy).await) });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, result)) => slots[index] = Some(result),
                    Err(e) => tracing::error!("Scan task failed: {}", e),
                }
            }
        }

        let results: Vec<SiteResult> = slots
            .into_iter()
            .zip(addresses)
            .map(|(slot, address)| {
                slot.unwrap_or_else(|| {
                    SiteResult::failure(
                        address.as_ref().trim(),
                        "Scan task failed before producing a result",
                    )
                })
            })
            .collect();

        let report = ScanReport::new(results);
        tracing::info!(
            "Scan completed: {} site(s), {} error(s) in {:?}",
            report.total_processed,
            report.error_count,
            start_time.elapsed()
        );
        report
    }
}

/// Normalizes, fetches and extracts one address
///
/// Invalid addresses short-circuit before any network access.
pub async fn scan_site<S: PageSource>(source: &S, address: &str, policy: &RetryPolicy) -> SiteResult {
    let normalized = match normalize_address(address) {
        Ok(normalized) => normalized,
        Err(e) => {
            tracing::warn!("Rejected address '{}': {}", address.trim(), e);
            return SiteResult::failure(address.trim(), e.to_string());
        }
    };

    match source.fetch_page(normalized.as_url(), policy).await {
        Ok(page) => {
            let items = extract_menu(&page.body);
            tracing::info!(
                "{}: {} menu entr{} after {} attempt(s)",
                normalized.address(),
                items.len(),
                if items.len() == 1 { "y" } else { "ies" },
                page.attempts
            );
            SiteResult::success(normalized.address(), items)
        }
        Err(e) => {
            tracing::warn!("{}: {}", normalized.address(), e);
            SiteResult::failure(normalized.address(), e.to_string())
        }
    }
}
