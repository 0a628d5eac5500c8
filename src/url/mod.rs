//! Address handling module for Menu-Scanner
//!
//! This module validates operator-supplied addresses and converts them into
//! fetch-ready URLs, including punycode conversion for Cyrillic domains.

mod domain;
mod normalize;

use ::url::Url;
use std::fmt;

// Re-export main functions
pub use domain::{contains_cyrillic, is_cyrillic_letter};
pub use normalize::normalize_address;

/// A validated, absolute, ASCII-hostname URL ready to be fetched
///
/// Only [`normalize_address`] constructs this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    /// The trimmed address as the operator supplied it
    address: String,
    url: Url,
}

impl NormalizedUrl {
    /// The trimmed input address this URL was built from
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The parsed URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The ASCII host name
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}
