//! Aggregation of extracted report data into one dataset.
//!
//! This module handles:
//! - Merging partial records per implementation (first writer wins per field)
//! - Running the discovery -> extraction -> merge pipeline
//! - Merge statistics

pub mod merge;
pub mod run;

// Re-export main types and functions
pub use merge::{Aggregator, Contribution, MergeStats};
pub use run::{extract_contributions, AggregationRun, Extraction};
