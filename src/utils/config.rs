//! Configuration and constants for report discovery and extraction.
//!
//! Every structural assumption about the toolchain output layout lives here
//! with a default, and can be overridden from a TOML file.

use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current canonical summary format version
pub const SUMMARY_FORMAT_VERSION: u32 = 1;

// Section headers of the canonical summary text. Changing any of these
// breaks round-trip with older summaries and requires a version bump.
pub const SUMMARY_TITLE: &str = "FPGA Implementation Report Summary";
pub const RESOURCE_SECTION_HEADER: &str = "RESOURCE UTILIZATION SUMMARY:";
pub const TIMING_SECTION_HEADER: &str = "TIMING SUMMARY (MHz):";
pub const LATENCY_SECTION_HEADER: &str = "LATENCY SUMMARY (cycles):";
pub const LATENCY_ROW_LABEL: &str = "Latency";
pub const FORMAT_VERSION_LABEL: &str = "Format Version:";

/// Cell written for an absent or undefined value
pub const ABSENT_CELL: &str = "-";

/// Decimal places used for frequencies in the summary text
pub const FREQUENCY_DECIMALS: usize = 3;

/// Smallest frequency that survives `FREQUENCY_DECIMALS` fixed rounding.
/// Anything lower (periods above about 2e6 ns) is written in scientific
/// notation, e.g. `3.333e-4`, so it does not read back as zero.
pub const MIN_FIXED_FREQUENCY_MHZ: f64 = 0.0005;

/// Periods are reported in ns, so MHz = 1000 / period
pub const NS_TO_MHZ: f64 = 1000.0;

// Toolchain place & route report markers
pub const RESOURCE_SUMMARY_MARKER: &str = "== Place & Route Resource Summary";
pub const TIMING_SUMMARY_MARKER: &str = "== Place & Route Timing Summary";

/// Resource kinds in display order
pub const DEFAULT_RESOURCE_KINDS: &[&str] = &["LUT", "FF", "DSP", "BRAM", "URAM"];

// Latency field names (HLS cosim reports use MAX_LATENCY, HDL Coder
// generated flows use TOTAL_EXECUTE_TIME)
pub const DEFAULT_LATENCY_FIELDS: &[&str] = &["MAX_LATENCY", "TOTAL_EXECUTE_TIME"];

pub const DEFAULT_IMPL_REPORT_PATTERN: &str = "**/impl/report/verilog/export_impl.rpt";
pub const DEFAULT_LATENCY_REPORT_PATTERN: &str = "**/sim/report/verilog/lat.rpt";
pub const DEFAULT_SUMMARY_PATTERN: &str = "*.txt";

/// Markers checked in priority order by the identity resolver
pub const DEFAULT_IDENTITY_MARKERS: &[&str] = &["proj_", "solution"];

/// `<impl>/impl/report/verilog/export_impl.rpt` -> `<impl>` is parent #3
pub const DEFAULT_FALLBACK_PARENT_INDEX: usize = 3;

pub const DEFAULT_SUMMARY_OUTPUT: &str = "fpga_implementation_summary.txt";

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub locator: LocatorConfig,
    pub identity: IdentityConfig,
    pub extract: ExtractConfig,
}

/// Path shapes searched by the report locator
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Toolchain resource/timing reports, relative to the root
    pub impl_report_pattern: String,

    /// Toolchain latency reports, relative to the root
    pub latency_report_pattern: String,

    /// Canonical summaries, relative to the summary directory
    pub summary_pattern: String,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            impl_report_pattern: DEFAULT_IMPL_REPORT_PATTERN.to_string(),
            latency_report_pattern: DEFAULT_LATENCY_REPORT_PATTERN.to_string(),
            summary_pattern: DEFAULT_SUMMARY_PATTERN.to_string(),
        }
    }
}

/// Identity inference heuristics
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Component substrings whose preceding component names the implementation
    pub markers: Vec<String>,

    /// Index into the report's parent chain (0 = containing directory)
    pub fallback_parent_index: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            markers: to_strings(DEFAULT_IDENTITY_MARKERS),
            fallback_parent_index: DEFAULT_FALLBACK_PARENT_INDEX,
        }
    }
}

/// Field names searched by the extractors
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub resource_kinds: Vec<String>,

    /// Tried in order, first hit wins
    pub latency_fields: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            resource_kinds: to_strings(DEFAULT_RESOURCE_KINDS),
            latency_fields: to_strings(DEFAULT_LATENCY_FIELDS),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Load a run configuration from a TOML file
///
/// Missing tables and keys fall back to the defaults above.
///
/// # Errors
/// * `ConfigError::Io` - If the file cannot be read
/// * `ConfigError::Parse` - If the TOML is invalid
///
/// # Example
/// ```ignore
/// let config = load_config("fpga-report.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ReportConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&contents)
}

/// Parse a run configuration from TOML text
pub fn load_config_from_str(contents: &str) -> Result<ReportConfig, ConfigError> {
    let config: ReportConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

impl ReportConfig {
    /// Reject configurations that would make every extraction come back empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extract.resource_kinds.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "resource kind names cannot be empty".to_string(),
            ));
        }

        if self.extract.latency_fields.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one latency field name is required".to_string(),
            ));
        }

        if self.identity.markers.iter().any(|m| m.is_empty()) {
            return Err(ConfigError::Invalid(
                "identity markers cannot be empty strings".to_string(),
            ));
        }

        let patterns = [
            &self.locator.impl_report_pattern,
            &self.locator.latency_report_pattern,
            &self.locator.summary_pattern,
        ];
        if patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "locator patterns cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
