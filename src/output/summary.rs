//! Canonical summary text writer.
//!
//! The layout written here is exactly what `parser::summary_report` reads
//! back. Section headers, row labels and the cell delimiter are part of
//! that contract; any change needs a `SUMMARY_FORMAT_VERSION` bump.

use super::prepare_output_path;
use crate::parser::schema::{Dataset, TimingStage};
use crate::utils::config::{
    ABSENT_CELL, DEFAULT_RESOURCE_KINDS, FORMAT_VERSION_LABEL, FREQUENCY_DECIMALS,
    LATENCY_ROW_LABEL, LATENCY_SECTION_HEADER, MIN_FIXED_FREQUENCY_MHZ, RESOURCE_SECTION_HEADER,
    SUMMARY_FORMAT_VERSION, SUMMARY_TITLE, TIMING_SECTION_HEADER,
};
use crate::utils::error::OutputError;
use log::{info, warn};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

const BANNER: &str = "===============================================";

/// Header metadata for a summary file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryMeta {
    /// Timestamp written to the header
    pub generated_at: String,

    /// Directory the reports were collected from
    pub base_directory: Option<String>,
}

impl SummaryMeta {
    /// Metadata stamped with the current time
    pub fn now(base_directory: Option<&Path>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            base_directory: base_directory.map(|p| p.display().to_string()),
        }
    }
}

/// One rendered table: column ids plus labelled rows
struct Table {
    ids: Vec<String>,
    rows: Vec<(String, Vec<String>)>,
}

/// Render a dataset as canonical summary text
///
/// **Public** - main entry point for summary output
///
/// Sections are always written in the order resources, timing
/// (as MHz), latency. Columns follow the dataset's id order.
pub fn render_summary(dataset: &Dataset, meta: &SummaryMeta) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", BANNER);
    let _ = writeln!(out, "{}", SUMMARY_TITLE);
    let _ = writeln!(out, "{} {}", FORMAT_VERSION_LABEL, SUMMARY_FORMAT_VERSION);
    let _ = writeln!(out, "Generated on: {}", meta.generated_at);
    if let Some(base) = &meta.base_directory {
        let _ = writeln!(out, "Base Directory: {}", base);
    }
    let _ = writeln!(out, "{}", BANNER);
    out.push('\n');

    out.push_str(&render_tables(dataset));

    let _ = writeln!(out, "{}", BANNER);
    let _ = writeln!(out, "End of Report");
    let _ = writeln!(out, "{}", BANNER);

    out
}

/// Render only the three section tables
///
/// **Public** - also used for printing a comparison to stdout
pub fn render_tables(dataset: &Dataset) -> String {
    let mut out = String::new();
    let ids = column_ids(dataset);

    write_section(&mut out, RESOURCE_SECTION_HEADER, "resource", dataset, || Table {
        ids: ids.clone(),
        rows: ordered_resource_kinds(dataset)
            .into_iter()
            .map(|kind| {
                let cells = dataset
                    .iter()
                    .map(|r| cell(r.resources.get(&kind).map(u64::to_string)))
                    .collect();
                (kind, cells)
            })
            .collect(),
    });

    write_section(&mut out, TIMING_SECTION_HEADER, "timing", dataset, || Table {
        ids: ids.clone(),
        rows: TimingStage::ALL
            .into_iter()
            .filter(|stage| dataset.iter().any(|r| r.timing.contains_key(stage)))
            .map(|stage| {
                let cells = dataset
                    .iter()
                    .map(|r| {
                        cell(r.frequency_mhz(stage).map(format_frequency))
                    })
                    .collect();
                (stage.label().to_string(), cells)
            })
            .collect(),
    });

    write_section(&mut out, LATENCY_SECTION_HEADER, "latency", dataset, || Table {
        ids: ids.clone(),
        rows: vec![(
            LATENCY_ROW_LABEL.to_string(),
            dataset
                .iter()
                .map(|r| cell(r.latency.map(|l| l.to_string())))
                .collect(),
        )],
    });

    out
}

/// Write a dataset as canonical summary text
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_summary(
    dataset: &Dataset,
    meta: &SummaryMeta,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();
    info!("Writing summary to: {}", output_path.display());

    prepare_output_path(output_path)?;
    std::fs::write(output_path, render_summary(dataset, meta))?;

    info!("Report summary written to {}", output_path.display());
    Ok(())
}

fn write_section<F>(out: &mut String, header: &str, kind: &str, dataset: &Dataset, table: F)
where
    F: FnOnce() -> Table,
{
    let _ = writeln!(out, "{}", header);
    let _ = writeln!(out, "{}", "-".repeat(header.len()));

    if dataset.is_empty() {
        let _ = writeln!(out, "No {} data available", kind);
    } else {
        format_table(out, &table());
    }
    out.push('\n');
}

fn format_table(out: &mut String, table: &Table) {
    let label_width = table.rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);

    let widths: Vec<usize> = table
        .ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            table
                .rows
                .iter()
                .filter_map(|(_, cells)| cells.get(i))
                .map(String::len)
                .chain(std::iter::once(id.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut line = " ".repeat(label_width);
    for (id, width) in table.ids.iter().zip(&widths) {
        let _ = write!(line, "  {:>width$}", id, width = width);
    }
    let _ = writeln!(out, "{}", line);

    for (label, cells) in &table.rows {
        let mut line = format!("{:<width$}", label, width = label_width);
        for (value, width) in cells.iter().zip(&widths) {
            let _ = write!(line, "  {:>width$}", value, width = width);
        }
        let _ = writeln!(out, "{}", line);
    }
}

/// Column headers; whitespace would split an id into several cells
fn column_ids(dataset: &Dataset) -> Vec<String> {
    dataset
        .ids()
        .map(|id| {
            if id.chars().any(char::is_whitespace) {
                let safe: String = id
                    .chars()
                    .map(|c| if c.is_whitespace() { '_' } else { c })
                    .collect();
                warn!("Implementation id '{}' written as '{}'", id, safe);
                safe
            } else {
                id.to_string()
            }
        })
        .collect()
}

/// Known kinds in display order, then any others alphabetically
fn ordered_resource_kinds(dataset: &Dataset) -> Vec<String> {
    let present: BTreeSet<&str> = dataset
        .iter()
        .flat_map(|r| r.resources.keys().map(String::as_str))
        .collect();

    let known = DEFAULT_RESOURCE_KINDS
        .iter()
        .copied()
        .filter(|kind| present.contains(kind));
    let extra = present
        .iter()
        .copied()
        .filter(|kind| !DEFAULT_RESOURCE_KINDS.contains(kind));

    known.chain(extra).map(str::to_string).collect()
}

/// Fixed decimals, or scientific notation when fixed decimals would
/// round a defined frequency down to zero
fn format_frequency(mhz: f64) -> String {
    if mhz < MIN_FIXED_FREQUENCY_MHZ {
        format!("{:.*e}", FREQUENCY_DECIMALS, mhz)
    } else {
        format!("{:.*}", FREQUENCY_DECIMALS, mhz)
    }
}

fn cell(value: Option<String>) -> String {
    value.unwrap_or_else(|| ABSENT_CELL.to_string())
}
