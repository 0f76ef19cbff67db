//! FPGA Report Studio
//!
//! Discovery, extraction and aggregation of FPGA toolchain
//! implementation reports.
//!
//! The pipeline locates place & route, latency and previously exported
//! summary reports under a project tree, infers which implementation each
//! report belongs to, extracts resources, timing and latency, and merges
//! everything into one dataset per implementation. The dataset is written
//! back as a canonical summary text that this crate can read again.
//!
//! ## Getting Started
//!
//! ```bash
//! fpga-report analyze --root HLS --summary-dir HDLCoder --print
//! ```
//!
//! As a library:
//!
//! ```ignore
//! use fpga_report_studio::aggregator::AggregationRun;
//! use fpga_report_studio::utils::config::ReportConfig;
//!
//! let mut run = AggregationRun::new("HLS", ReportConfig::default());
//! let dataset = run.execute()?;
//! ```

pub mod aggregator;
pub mod commands;
pub mod identity;
pub mod locator;
pub mod output;
pub mod parser;
pub mod utils;
