//! Menu-Scanner: batch navigation-menu extraction
//!
//! This crate validates candidate website addresses (including Cyrillic
//! domains), fetches each front page with bounded retries, and extracts the
//! links that make up the primary navigation menu.

pub mod config;
pub mod output;
pub mod request;
pub mod scanner;
pub mod url;

use thiserror::Error;

/// Main error type for Menu-Scanner operations
///
/// Per-address failures never surface here; they are recorded on the
/// corresponding [`output::SiteResult`]. This type covers the boundary:
/// configuration, request parsing and client construction.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid request: {0}")]
    Request(#[from] RequestShapeError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid header: {0}")]
    Header(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Address validation errors
///
/// Raised by [`url::normalize_address`] before any network access happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Address is empty")]
    Empty,

    #[error("Domain '{0}' must have at least two labels (e.g. example.com)")]
    TooFewLabels(String),

    #[error("Invalid Cyrillic top-level domain: '{0}'")]
    InvalidCyrillicTld(String),

    #[error("Domain label '{label}' in '{domain}' is invalid")]
    InvalidLabel { domain: String, label: String },

    #[error("Failed to encode label '{0}' as punycode")]
    Punycode(String),

    #[error("Malformed URL '{url}': {reason}")]
    Malformed { url: String, reason: String },
}

/// Failure cause of a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error("HTTP error status: {0}")]
    HttpStatus(u16),

    #[error("response is not HTML (content-type: {0})")]
    UnexpectedContentType(String),
}

/// Fetch error after all attempts were exhausted
///
/// Carries the cause of the last attempt only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch {url} after {attempts} attempt(s): {cause}")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    pub cause: FetchFailure,
}

/// Malformed incoming scan request
#[derive(Debug, Error)]
pub enum RequestShapeError {
    #[error("Failed to parse request: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Request contains no addresses")]
    NoAddresses,

    #[error("Option '{name}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: u64,
        max: u64,
        value: u64,
    },

    #[error("Validation error: {} invalid address(es)", .0.len())]
    InvalidAddresses(Vec<String>),
}

/// Result type alias for Menu-Scanner operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for address normalization
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

// Re-export commonly used types
pub use crate::config::{Config, ScanOptions};
pub use crate::output::{MenuEntry, ScanReport, SiteResult};
pub use crate::scanner::{extract_menu, PageFetcher, RetryPolicy, Scanner};
pub use crate::url::{normalize_address, NormalizedUrl};
