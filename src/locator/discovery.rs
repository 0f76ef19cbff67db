//! Enumerate report files beneath a root directory.
//!
//! Each report flavor is found by a glob pattern relative to its base
//! directory. Results are sorted lexicographically and deduplicated so
//! downstream merge order is deterministic.

use crate::utils::config::LocatorConfig;
use crate::utils::error::LocateError;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Report files found for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredReports {
    /// Toolchain place & route reports
    pub impl_reports: Vec<PathBuf>,

    /// Co-simulation latency reports
    pub latency_reports: Vec<PathBuf>,

    /// Previously exported summary text files
    pub summary_reports: Vec<PathBuf>,
}

impl DiscoveredReports {
    /// Total number of report files found
    pub fn total(&self) -> usize {
        self.impl_reports.len() + self.latency_reports.len() + self.summary_reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Locate every known report flavor
///
/// **Public** - main entry point for discovery
///
/// # Arguments
/// * `root` - Directory searched for toolchain reports
/// * `summary_dir` - Directory holding summary text files (defaults to `root`)
/// * `config` - Path patterns
///
/// # Errors
/// * `LocateError::RootUnreadable` - A base directory cannot be listed
/// * `LocateError::NonUtf8Root` - A base directory cannot be expressed as a pattern
/// * `LocateError::InvalidPattern` - A configured pattern is malformed
pub fn locate_reports(
    root: &Path,
    summary_dir: Option<&Path>,
    config: &LocatorConfig,
) -> Result<DiscoveredReports, LocateError> {
    let summary_dir = summary_dir.unwrap_or(root);

    let reports = DiscoveredReports {
        impl_reports: find_matching(root, &config.impl_report_pattern)?,
        latency_reports: find_matching(root, &config.latency_report_pattern)?,
        summary_reports: find_matching(summary_dir, &config.summary_pattern)?,
    };

    info!(
        "Found {} implementation reports, {} latency reports, {} summary reports",
        reports.impl_reports.len(),
        reports.latency_reports.len(),
        reports.summary_reports.len()
    );

    if reports.impl_reports.is_empty() {
        debug!(
            "No implementation reports in {} (pattern: {})",
            root.display(),
            config.impl_report_pattern
        );
    }
    for report in reports
        .impl_reports
        .iter()
        .chain(&reports.latency_reports)
        .chain(&reports.summary_reports)
    {
        debug!("  - {}", report.display());
    }

    Ok(reports)
}

/// Find files under `base` matching a relative glob pattern
///
/// Entries that cannot be read are logged and skipped.
pub fn find_matching(base: &Path, pattern: &str) -> Result<Vec<PathBuf>, LocateError> {
    fs::read_dir(base).map_err(|source| LocateError::RootUnreadable {
        path: base.to_path_buf(),
        source,
    })?;

    let base_str = base
        .to_str()
        .ok_or_else(|| LocateError::NonUtf8Root(base.to_path_buf()))?;

    // Escape the base so only the configured pattern is interpreted
    let escaped = glob::Pattern::escape(base_str);
    let full_pattern = Path::new(&escaped).join(pattern);
    let full_pattern = full_pattern.to_string_lossy();

    let entries = glob::glob(&full_pattern).map_err(|source| LocateError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path {}: {}", e.path().display(), e.error());
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();

    files.sort();
    files.dedup();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_locate_all_flavors_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let b = touch(root, "implB/impl/report/verilog/export_impl.rpt");
        let a = touch(root, "implA/impl/report/verilog/export_impl.rpt");
        let lat = touch(root, "implA/sim/report/verilog/lat.rpt");
        let txt = touch(root, "old_summary.txt");
        touch(root, "implA/notes.txt");
        touch(root, "implA/impl/report/verilog/other.rpt");

        let reports = locate_reports(root, None, &LocatorConfig::default()).unwrap();

        assert_eq!(reports.impl_reports, vec![a, b]);
        assert_eq!(reports.latency_reports, vec![lat]);
        assert_eq!(reports.summary_reports, vec![txt]);
        assert_eq!(reports.total(), 4);
    }

    #[test]
    fn test_empty_tree_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let reports = locate_reports(dir.path(), None, &LocatorConfig::default()).unwrap();
        assert!(reports.is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = locate_reports(&missing, None, &LocatorConfig::default());
        assert!(matches!(result, Err(LocateError::RootUnreadable { .. })));
    }

    #[test]
    fn test_separate_summary_dir() {
        let dir = tempfile::tempdir().unwrap();
        let hls = dir.path().join("HLS");
        let hdl = dir.path().join("HDLCoder");
        fs::create_dir_all(&hls).unwrap();
        touch(&hls, "ignored.txt");
        let summary = touch(&hdl, "opt4.txt");

        let reports =
            locate_reports(&hls, Some(&hdl), &LocatorConfig::default()).unwrap();
        assert_eq!(reports.summary_reports, vec![summary]);
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let result = find_matching(dir.path(), "[unclosed");
        assert!(matches!(result, Err(LocateError::InvalidPattern { .. })));
    }

    #[test]
    fn test_base_with_glob_characters() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("run[1]");
        let report = touch(&base, "x/impl/report/verilog/export_impl.rpt");

        let found = find_matching(&base, "**/impl/report/verilog/export_impl.rpt").unwrap();
        assert_eq!(found, vec![report]);
    }
}
