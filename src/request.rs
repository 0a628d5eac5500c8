//! Incoming scan requests
//!
//! The request document is the boundary between callers and the scanner:
//!
//! ```json
//! { "urls": ["example.com", "сайт.рф"], "options": { "batchSize": 3, "timeout": 10000, "retries": 3 } }
//! ```
//!
//! Parsing rejects malformed documents, out-of-range options and addresses
//! that fail validation. The scanner re-validates every address anyway.

use crate::config::{ScanOptions, BATCH_SIZE_RANGE, MAX_RETRIES_RANGE, TIMEOUT_MS_RANGE};
use crate::url::normalize_address;
use crate::RequestShapeError;
use serde::Deserialize;
use std::ops::RangeInclusive;

/// Message attached to every rejected address
pub const INVALID_ADDRESS_MESSAGE: &str =
    "Invalid URL format. Plain and Cyrillic domains are supported (e.g. example.com, сайт.рф)";

/// A parsed scan request
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    pub urls: Vec<String>,
    #[serde(default)]
    pub options: RequestOptions,
}

/// Optional per-request overrides
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    pub batch_size: Option<u64>,
    pub timeout: Option<u64>,
    pub retries: Option<u64>,
}

impl ScanRequest {
    /// Parses and validates a JSON request document
    pub fn from_json(input: &str) -> Result<Self, RequestShapeError> {
        let request: ScanRequest = serde_json::from_str(input)?;
        request.validate()?;
        Ok(request)
    }

    /// Builds a request from a plain list of addresses
    pub fn from_addresses(urls: Vec<String>) -> Self {
        Self {
            urls,
            options: RequestOptions::default(),
        }
    }

    /// Checks option ranges and address syntax
    ///
    /// Every invalid address is reported, each prefixed with its index.
    /// An empty `urls` list is valid and yields an empty report.
    pub fn validate(&self) -> Result<(), RequestShapeError> {
        let batch_range = (*BATCH_SIZE_RANGE.start() as u64)..=(*BATCH_SIZE_RANGE.end() as u64);
        let retries_range =
            u64::from(*MAX_RETRIES_RANGE.start())..=u64::from(*MAX_RETRIES_RANGE.end());

        check_range("batchSize", self.options.batch_size, &batch_range)?;
        check_range("timeout", self.options.timeout, &TIMEOUT_MS_RANGE)?;
        check_range("retries", self.options.retries, &retries_range)?;

        let invalid: Vec<String> = self
            .urls
            .iter()
            .enumerate()
            .filter_map(|(index, url)| {
                normalize_address(url)
                    .err()
                    .map(|_| format!("urls[{}] '{}': {}", index, url, INVALID_ADDRESS_MESSAGE))
            })
            .collect();

        if !invalid.is_empty() {
            return Err(RequestShapeError::InvalidAddresses(invalid));
        }

        Ok(())
    }

    /// Applies the request overrides on top of base options
    pub fn options_over(&self, base: &ScanOptions) -> ScanOptions {
        let mut options = base.clone();
        if let Some(batch_size) = self.options.batch_size {
            options.batch_size = usize::try_from(batch_size).unwrap_or(usize::MAX);
        }
        if let Some(timeout) = self.options.timeout {
            options.timeout_ms = timeout;
        }
        if let Some(retries) = self.options.retries {
            options.max_retries = u32::try_from(retries).unwrap_or(u32::MAX);
        }
        options.clamped()
    }
}

fn check_range(
    name: &'static str,
    value: Option<u64>,
    range: &RangeInclusive<u64>,
) -> Result<(), RequestShapeError> {
    match value {
        Some(value) if !range.contains(&value) => Err(RequestShapeError::OutOfRange {
            name,
            min: *range.start(),
            max: *range.end(),
            value,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_request() {
        let request = ScanRequest::from_json(r#"{"urls": ["example.com"]}"#).unwrap();
        assert_eq!(request.urls, vec!["example.com".to_string()]);
        assert!(request.options.batch_size.is_none());
    }

    #[test]
    fn test_parse_with_options() {
        let request = ScanRequest::from_json(
            r#"{"urls": ["example.com", "сайт.рф"], "options": {"batchSize": 5, "timeout": 2000, "retries": 1}}"#,
        )
        .unwrap();
        let options = request.options_over(&ScanOptions::default());
        assert_eq!(options.batch_size, 5);
        assert_eq!(options.timeout_ms, 2000);
        assert_eq!(options.max_retries, 1);
        assert_eq!(options.retry_delay_ms, 1000);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ScanRequest::from_json("{urls: nope").unwrap_err(),
            RequestShapeError::Parse(_)
        ));
    }

    #[test]
    fn test_missing_urls() {
        assert!(ScanRequest::from_json(r#"{"options": {}}"#).is_err());
    }

    #[test]
    fn test_empty_urls_accepted() {
        let request = ScanRequest::from_json(r#"{"urls": []}"#).unwrap();
        assert!(request.urls.is_empty());
    }

    #[test]
    fn test_out_of_range_option() {
        let err = ScanRequest::from_json(r#"{"urls": ["example.com"], "options": {"batchSize": 11}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            RequestShapeError::OutOfRange { name: "batchSize", value: 11, .. }
        ));

        let err = ScanRequest::from_json(r#"{"urls": ["example.com"], "options": {"timeout": 500}}"#)
            .unwrap_err();
        assert!(matches!(err, RequestShapeError::OutOfRange { name: "timeout", .. }));
    }

    #[test]
    fn test_invalid_addresses_listed_with_index() {
        let err = ScanRequest::from_json(r#"{"urls": ["example.com", "localhost", "-x.com"]}"#)
            .unwrap_err();
        match err {
            RequestShapeError::InvalidAddresses(details) => {
                assert_eq!(details.len(), 2);
                assert!(details[0].starts_with("urls[1]"));
                assert!(details[1].starts_with("urls[2]"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_options_over_keeps_base_when_absent() {
        let request = ScanRequest::from_addresses(vec!["example.com".to_string()]);
        let base = ScanOptions {
            batch_size: 7,
            ..ScanOptions::default()
        };
        assert_eq!(request.options_over(&base).batch_size, 7);
    }
}
