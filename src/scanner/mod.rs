//! Scanner module: fetching front pages and extracting their menus
//!
//! This module contains the scanning pipeline, including:
//! - HTTP fetching with timeout, retry and backoff
//! - Navigation menu extraction from HTML
//! - Batched, concurrent orchestration over many addresses

mod delay;
mod fetcher;
mod menu;
mod orchestrator;

pub use delay::{Delay, RecordingDelay, TokioDelay};
pub use fetcher::{build_http_client, FetchedPage, PageFetcher, RetryPolicy, DEFAULT_ACCEPT};
pub use menu::{extract_menu, extract_menu_with, MenuRule, MENU_RULES, SKIPPED_EXTENSIONS};
pub use orchestrator::{scan_site, PageSource, Scanner};

use crate::config::Config;
use crate::output::ScanReport;
use crate::ScanError;

/// Runs a complete scan with a real HTTP fetcher
///
/// This is the main entry point for the library. It will:
/// 1. Build the HTTP client from configuration
/// 2. Validate and normalize each address
/// 3. Fetch front pages batch by batch
/// 4. Extract menus and assemble the report
///
/// Only client construction can fail; per-address problems end up in the
/// report.
pub async fn scan<A: AsRef<str>>(addresses: &[A], config: &Config) -> Result<ScanReport, ScanError> {
    let scanner = Scanner::from_config(config)?;
    Ok(scanner.scan(addresses).await)
}
