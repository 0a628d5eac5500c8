//! Response envelopes written back to the caller

use crate::output::{ScanReport, SiteResult};
use crate::{RequestShapeError, ScanError};
use serde::Serialize;

/// Status code reported for malformed requests
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Status code reported for internal failures
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Successful scan envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub success: bool,
    pub results: Vec<SiteResult>,
    pub total_processed: usize,
    pub errors: usize,
}

impl From<ScanReport> for ScanResponse {
    fn from(report: ScanReport) -> Self {
        Self {
            success: true,
            total_processed: report.total_processed,
            errors: report.error_count,
            results: report.results,
        }
    }
}

/// Failure envelope for requests that never reached the scanner
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    pub status: u16,
}

impl ErrorResponse {
    /// Maps a boundary error to its envelope
    ///
    /// Request-shape problems are caller mistakes (400). Configuration
    /// problems are reported as 500 with the offending setting in
    /// `details`; anything else is a bare internal failure.
    pub fn from_error(err: &ScanError) -> Self {
        match err {
            ScanError::Request(RequestShapeError::InvalidAddresses(details)) => Self {
                success: false,
                error: "Validation error".to_string(),
                details: details.clone(),
                status: STATUS_BAD_REQUEST,
            },
            ScanError::Request(shape) => Self {
                success: false,
                error: "Validation error".to_string(),
                details: vec![shape.to_string()],
                status: STATUS_BAD_REQUEST,
            },
            ScanError::Config(_) | ScanError::Header(_) => Self {
                success: false,
                error: "Configuration error".to_string(),
                details: vec![err.to_string()],
                status: STATUS_INTERNAL_ERROR,
            },
            _ => Self {
                success: false,
                error: "Internal server error".to_string(),
                details: Vec::new(),
                status: STATUS_INTERNAL_ERROR,
            },
        }
    }
}
