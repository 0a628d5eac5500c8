//! Output module for scan results
//!
//! This module handles:
//! - The per-site result and consolidated report types
//! - The success and failure envelopes handed back to the caller
//! - Writing envelopes as JSON

mod report;
pub mod response;

pub use report::{MenuEntry, ScanReport, SiteResult};
pub use response::{ErrorResponse, ScanResponse};

use serde::Serialize;
use std::io::Write;

/// Writes any envelope as JSON followed by a newline
///
/// # Arguments
///
/// * `writer` - Destination, usually stdout
/// * `value` - The envelope to serialize
/// * `pretty` - Indent the output for humans
pub fn write_json<W: Write, T: Serialize>(
    mut writer: W,
    value: &T,
    pretty: bool,
) -> Result<(), crate::ScanError> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    Ok(())
}
