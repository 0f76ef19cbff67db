//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads the run configuration
//! 2. Locates, extracts and merges every report under the root
//! 3. Writes the canonical summary text
//! 4. Writes the JSON dataset (if requested)

use crate::aggregator::AggregationRun;
use crate::output::{render_tables, write_dataset, write_summary, SummaryMeta};
use crate::utils::config::{load_config, ReportConfig, DEFAULT_SUMMARY_OUTPUT};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Directory searched for toolchain reports
    pub root: PathBuf,

    /// Directory searched for summary text files (defaults to root)
    pub summary_dir: Option<PathBuf>,

    /// Output path for the canonical summary text
    pub output_summary: PathBuf,

    /// Output path for the JSON dataset (optional)
    pub output_json: Option<PathBuf>,

    /// TOML configuration file (optional)
    pub config_path: Option<PathBuf>,

    /// Extraction worker threads (None = one per core)
    pub jobs: Option<usize>,

    /// Print the comparison tables to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            summary_dir: None,
            output_summary: PathBuf::from(DEFAULT_SUMMARY_OUTPUT),
            output_json: None,
            config_path: None,
            jobs: None,
            print_summary: false,
        }
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// Returns the finished run so callers can inspect the dataset and counts.
/// Finding no reports is not an error: an empty summary is still written
/// and the zero count is left for the caller to judge.
///
/// # Errors
/// * Invalid or unreadable configuration
/// * Unreadable root or summary directory
/// * Output write failures
pub fn execute_analyze(args: AnalyzeArgs) -> Result<AggregationRun> {
    let start_time = Instant::now();

    info!("Analyzing reports in: {}", args.root.display());
    if let Some(dir) = &args.summary_dir {
        info!("Summary reports from: {}", dir.display());
    }

    // Step 1: Configuration
    info!("Step 1/4: Loading configuration...");
    let config = match &args.config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => ReportConfig::default(),
    };
    debug!("Configuration: {:?}", config);

    // Step 2: Locate, extract, merge
    info!("Step 2/4: Locating and extracting reports...");
    let mut run = AggregationRun::new(&args.root, config);
    if let Some(dir) = &args.summary_dir {
        run = run.with_summary_dir(dir);
    }
    if let Some(jobs) = args.jobs {
        run = run.with_jobs(jobs);
    }

    run.execute().context("Failed to aggregate reports")?;

    if run.report_count() == 0 {
        warn!("No reports found!");
    }

    // Step 3: Canonical summary
    info!("Step 3/4: Writing summary...");
    let meta = SummaryMeta::now(Some(&args.root));
    write_summary(&run.dataset, &meta, &args.output_summary)
        .context("Failed to write summary text")?;

    info!("✓ Summary written to: {}", args.output_summary.display());

    // Step 4: JSON dataset (if requested)
    if let Some(json_path) = &args.output_json {
        info!("Step 4/4: Writing JSON dataset...");
        write_dataset(&run.dataset, json_path).context("Failed to write dataset JSON")?;
        info!("✓ Dataset written to: {}", json_path.display());
    } else {
        info!("Step 4/4: Skipping JSON dataset (not requested)");
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("IMPLEMENTATION SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Reports found:    {}", run.report_count());
        println!("Implementations:  {}", run.dataset.len());
        println!("Skipped files:    {}", run.skipped_files.len());
        println!("\n{}", render_tables(&run.dataset));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(run)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.root.as_os_str().is_empty() {
        anyhow::bail!("Report root cannot be empty");
    }

    if !args.root.is_dir() {
        anyhow::bail!("Report root is not a directory: {}", args.root.display());
    }

    if let Some(dir) = &args.summary_dir {
        if !dir.is_dir() {
            anyhow::bail!("Summary directory is not a directory: {}", dir.display());
        }
    }

    if args.output_summary.as_os_str().is_empty() {
        anyhow::bail!("Summary output path cannot be empty");
    }

    if args.output_summary.is_dir() {
        anyhow::bail!(
            "Summary output path is a directory: {}",
            args.output_summary.display()
        );
    }

    if args.output_json.as_ref() == Some(&args.output_summary) {
        anyhow::bail!("JSON output and summary output must be different files");
    }

    if args.jobs == Some(0) {
        anyhow::bail!("jobs must be greater than 0");
    }

    Ok(())
}
