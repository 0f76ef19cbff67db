//! Extractor for co-simulation latency reports (`lat.rpt`).
//!
//! The report carries Tcl-style assignments such as
//! `$MAX_LATENCY = "1234"`.

use super::patterns::ExtractPatterns;
use super::read_report;
use crate::utils::error::ExtractError;
use log::{debug, warn};
use std::path::Path;

/// Extract the latency cycle count from report text
///
/// Field names are tried in configured order; the first one present wins.
pub fn extract_latency_report(content: &str, patterns: &ExtractPatterns) -> Option<u64> {
    for (field, re) in &patterns.latency {
        let Some(value) = re.captures(content).and_then(|c| c.get(1)) else {
            continue;
        };

        match value.as_str().parse::<u64>() {
            Ok(cycles) => {
                debug!("Found latency {} = {}", field, cycles);
                return Some(cycles);
            }
            Err(e) => warn!("Invalid {} value '{}': {}", field, value.as_str(), e),
        }
    }

    None
}

/// Read and extract a latency report
///
/// A readable report without any latency field is `Ok(None)`.
///
/// # Errors
/// * `ExtractError::Io` - File missing, unreadable or not valid UTF-8
pub fn extract_latency_report_file(
    path: &Path,
    patterns: &ExtractPatterns,
) -> Result<Option<u64>, ExtractError> {
    let content = read_report(path)?;
    Ok(extract_latency_report(&content, patterns))
}
