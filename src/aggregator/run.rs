//! Explicit context for one aggregation run.
//!
//! The run owns its inputs (root, summary directory, configuration) and its
//! results (discovered files, merged dataset), so nothing depends on the
//! process working directory.

use super::merge::{Aggregator, Contribution, MergeStats};
use crate::identity::resolve_implementation_id;
use crate::locator::{locate_reports, DiscoveredReports};
use crate::parser::schema::{Dataset, PartialRecord, SourceKind};
use crate::parser::{
    extract_impl_report_file, extract_latency_report_file, parse_summary_file, ExtractPatterns,
};
use crate::utils::config::ReportConfig;
use crate::utils::error::LocateError;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// State of one discovery -> extraction -> merge pass
#[derive(Debug, Clone)]
pub struct AggregationRun {
    /// Directory searched for toolchain reports
    pub root: PathBuf,

    /// Directory searched for summary text (defaults to `root`)
    pub summary_dir: Option<PathBuf>,

    pub config: ReportConfig,

    /// Worker threads for extraction (None = rayon default)
    pub jobs: Option<usize>,

    pub discovered: DiscoveredReports,

    pub dataset: Dataset,

    pub stats: MergeStats,

    /// Files that could not be read and were skipped
    pub skipped_files: Vec<PathBuf>,
}

/// Output of extracting every discovered file
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Contributions in merge order
    pub contributions: Vec<Contribution>,

    pub skipped_files: Vec<PathBuf>,
}

impl AggregationRun {
    pub fn new(root: impl Into<PathBuf>, config: ReportConfig) -> Self {
        Self {
            root: root.into(),
            summary_dir: None,
            config,
            jobs: None,
            discovered: DiscoveredReports::default(),
            dataset: Dataset::default(),
            stats: MergeStats::default(),
            skipped_files: Vec::new(),
        }
    }

    pub fn with_summary_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.summary_dir = Some(dir.into());
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Locate, extract and merge every report
    ///
    /// **Public** - main entry point for aggregation
    ///
    /// # Errors
    /// * `LocateError` - The root or summary directory cannot be read.
    ///   Failures on individual report files never abort the run.
    pub fn execute(&mut self) -> Result<&Dataset, LocateError> {
        let start_time = Instant::now();

        info!("Locating reports in: {}", self.root.display());
        self.discovered =
            locate_reports(&self.root, self.summary_dir.as_deref(), &self.config.locator)?;

        if self.discovered.is_empty() {
            warn!("No reports found under {}", self.root.display());
        }

        let extraction = self.extract();
        self.skipped_files = extraction.skipped_files;

        let mut aggregator = Aggregator::new();
        aggregator.merge_all(extraction.contributions);
        let (dataset, stats) = aggregator.finish();

        self.dataset = dataset;
        self.stats = stats;

        info!("Aggregation: {}", self.stats.summary());
        if !self.skipped_files.is_empty() {
            warn!("{} report files could not be read", self.skipped_files.len());
        }
        debug!("Aggregation completed in {:.2}s", start_time.elapsed().as_secs_f64());

        Ok(&self.dataset)
    }

    /// Extract discovered files, on a dedicated pool when `jobs` is set
    fn extract(&self) -> Extraction {
        let Some(jobs) = self.jobs else {
            return extract_contributions(&self.discovered, &self.config);
        };

        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| extract_contributions(&self.discovered, &self.config)),
            Err(e) => {
                warn!("Failed to build thread pool ({}), using default pool", e);
                extract_contributions(&self.discovered, &self.config)
            }
        }
    }

    /// Number of report files found by the last run
    pub fn report_count(&self) -> usize {
        self.discovered.total()
    }
}

/// Turn discovered files into contributions
///
/// Files are processed in parallel; the returned order is fixed:
/// implementation reports, then latency reports, then summaries, each in
/// sorted path order. This order is what makes toolchain reports win
/// over re-ingested summaries.
///
/// A file that cannot be read contributes nothing, whatever its kind, and
/// is listed in `skipped_files`. A readable file without usable fields
/// still contributes an empty record for its id.
pub fn extract_contributions(reports: &DiscoveredReports, config: &ReportConfig) -> Extraction {
    let patterns = ExtractPatterns::new(&config.extract);

    let impl_results: Vec<Result<Contribution, PathBuf>> = reports
        .impl_reports
        .par_iter()
        .map(|path| {
            let id = resolve_implementation_id(path, &config.identity);
            debug!("Processing implementation: {}", id);
            extract_impl_report_file(path, &patterns)
                .map(|partial| Contribution::new(id, partial, SourceKind::ImplReport))
                .map_err(|e| {
                    warn!("Skipping implementation report: {}", e);
                    path.clone()
                })
        })
        .collect();

    let latency_results: Vec<Result<Contribution, PathBuf>> = reports
        .latency_reports
        .par_iter()
        .map(|path| {
            let id = resolve_implementation_id(path, &config.identity);
            extract_latency_report_file(path, &patterns)
                .map(|latency| {
                    Contribution::new(
                        id,
                        PartialRecord::with_latency(latency),
                        SourceKind::LatencyReport,
                    )
                })
                .map_err(|e| {
                    warn!("Skipping latency report: {}", e);
                    path.clone()
                })
        })
        .collect();

    let summary_results: Vec<Result<Vec<Contribution>, PathBuf>> = reports
        .summary_reports
        .par_iter()
        .map(|path| summary_contributions(path))
        .collect();

    let mut extraction = Extraction::default();

    for result in impl_results.into_iter().chain(latency_results) {
        match result {
            Ok(c) => extraction.contributions.push(c),
            Err(path) => extraction.skipped_files.push(path),
        }
    }

    for result in summary_results {
        match result {
            Ok(cs) => extraction.contributions.extend(cs),
            Err(path) => extraction.skipped_files.push(path),
        }
    }

    extraction
}

fn summary_contributions(path: &Path) -> Result<Vec<Contribution>, PathBuf> {
    let doc = parse_summary_file(path).map_err(|e| {
        warn!("Error parsing summary report: {}", e);
        path.to_path_buf()
    })?;

    if doc.sections_found == 0 {
        debug!("{} is not a summary report, ignoring", path.display());
        return Ok(Vec::new());
    }

    debug!(
        "Processing summary report {}: {} implementations",
        path.display(),
        doc.records.len()
    );

    Ok(doc
        .records
        .into_iter()
        .map(|(id, partial)| Contribution::new(id, partial, SourceKind::SummaryText))
        .collect())
}
