//! Report extraction and data model definitions.
//!
//! This module handles:
//! - Extracting resources and timing from place & route reports
//! - Extracting latency from co-simulation reports
//! - Parsing previously exported summary text
//! - Defining the per-implementation record types

pub mod impl_report;
pub mod latency_report;
pub mod patterns;
pub mod schema;
pub mod summary_report;

use crate::utils::error::ExtractError;
use log::debug;
use std::path::Path;

// Re-export main types
pub use impl_report::{extract_impl_report, extract_impl_report_file};
pub use latency_report::{extract_latency_report, extract_latency_report_file};
pub use patterns::ExtractPatterns;
pub use schema::{
    frequency_mhz, period_ns, Dataset, ImplementationRecord, PartialRecord, SourceKind,
    TimingStage,
};
pub use summary_report::{parse_summary_file, parse_summary_text, SummaryDocument};

/// Read a report file as UTF-8 text
///
/// **Public** - shared by all file-level extractors
///
/// # Errors
/// * `ExtractError::Io` - File missing, unreadable or not valid UTF-8
pub fn read_report(path: &Path) -> Result<String, ExtractError> {
    debug!("Reading report: {}", path.display());

    std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}
