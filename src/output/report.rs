use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single link from a site's primary navigation
///
/// Two entries are duplicates when `url` and `text` are both exactly equal;
/// `target` and `rel` take no part in that comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    /// Trimmed display label
    pub text: String,

    /// Raw `href` value as found in the markup
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
}

impl MenuEntry {
    /// Key used for deduplication
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.url, &self.text)
    }
}

/// Outcome of scanning one address
///
/// Invariant: when `error` is set, `items` is empty. The fields are private
/// so the two constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteResult {
    site_url: String,
    items: Vec<MenuEntry>,
    scanned_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SiteResult {
    /// A successful scan, stamped with the current time
    pub fn success(site_url: impl Into<String>, items: Vec<MenuEntry>) -> Self {
        Self {
            site_url: site_url.into(),
            items,
            scanned_at: Utc::now(),
            error: None,
        }
    }

    /// A failed scan, stamped with the current time
    pub fn failure(site_url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            items: Vec::new(),
            scanned_at: Utc::now(),
            error: Some(error.into()),
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn items(&self) -> &[MenuEntry] {
        &self.items
    }

    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Consolidated result of one scan invocation, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub results: Vec<SiteResult>,
    pub total_processed: usize,
    pub error_count: usize,
}

impl ScanReport {
    /// Builds a report, deriving the counters from the results
    pub fn new(results: Vec<SiteResult>) -> Self {
        let error_count = results.iter().filter(|r| r.is_error()).count();
        Self {
            total_processed: results.len(),
            error_count,
            results,
        }
    }

    /// True when no site produced an error
    pub fn all_succeeded(&self) -> bool {
        self.error_count == 0
    }
}
