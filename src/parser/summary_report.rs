//! Parser for the canonical summary text written by `output::summary`.
//!
//! Each section is a fixed header line, a dashed rule, a row of
//! implementation ids, and one labelled row per metric. A blank line ends
//! the section. Cells are whitespace-separated; `-` and `NaN` mark absent
//! values.
//!
//! Older exports wrote the latency section as one `<id> <cycles>` row per
//! implementation instead of a single `Latency` row; both layouts are read.

use super::impl_report::normalize_newlines;
use super::read_report;
use super::schema::{period_ns, PartialRecord, TimingStage};
use crate::utils::config::{
    ABSENT_CELL, FORMAT_VERSION_LABEL, LATENCY_ROW_LABEL, LATENCY_SECTION_HEADER,
    RESOURCE_SECTION_HEADER, SUMMARY_FORMAT_VERSION, TIMING_SECTION_HEADER,
};
use crate::utils::error::ExtractError;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed canonical summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryDocument {
    /// Declared format version, if the header carries one
    pub format_version: Option<u32>,

    /// Number of section headers recognized
    pub sections_found: usize,

    /// Implementation id (table column) -> metrics
    pub records: BTreeMap<String, PartialRecord>,
}

/// One section's table before interpretation
struct Table<'a> {
    ids: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<&'a str>)>,
}

/// Parse canonical summary text
///
/// **Public** - never fails; unrecognized sections or cells are skipped
/// and reported through the log.
pub fn parse_summary_text(content: &str) -> SummaryDocument {
    let content = normalize_newlines(content);
    let lines: Vec<&str> = content.lines().collect();

    let mut doc = SummaryDocument {
        format_version: parse_format_version(&lines),
        ..Default::default()
    };

    if let Some(version) = doc.format_version {
        if version > SUMMARY_FORMAT_VERSION {
            warn!(
                "Summary format version {} is newer than supported version {}",
                version, SUMMARY_FORMAT_VERSION
            );
        }
    }

    if let Some(body) = section_body(&lines, RESOURCE_SECTION_HEADER, &mut doc.sections_found) {
        if let Some(table) = split_table(&body, RESOURCE_SECTION_HEADER) {
            fill_resources(&mut doc.records, &table);
        }
    }
    if let Some(body) = section_body(&lines, TIMING_SECTION_HEADER, &mut doc.sections_found) {
        if let Some(table) = split_table(&body, TIMING_SECTION_HEADER) {
            fill_timing(&mut doc.records, &table);
        }
    }
    if let Some(body) = section_body(&lines, LATENCY_SECTION_HEADER, &mut doc.sections_found) {
        if is_series_layout(&body) {
            fill_latency_series(&mut doc.records, &body);
        } else if let Some(table) = split_table(&body, LATENCY_SECTION_HEADER) {
            fill_latency(&mut doc.records, &table);
        }
    }

    debug!(
        "Parsed summary: {} sections, {} implementations",
        doc.sections_found,
        doc.records.len()
    );

    doc
}

/// Read and parse a canonical summary file
pub fn parse_summary_file(path: &Path) -> Result<SummaryDocument, ExtractError> {
    let content = read_report(path)?;
    Ok(parse_summary_text(&content))
}

fn parse_format_version(lines: &[&str]) -> Option<u32> {
    lines.iter().find_map(|line| {
        line.trim()
            .strip_prefix(FORMAT_VERSION_LABEL)
            .and_then(|v| v.trim().parse().ok())
    })
}

/// Locate a section and return its trimmed body lines
///
/// The body starts after the dashed rule and ends at a blank line or a
/// banner. Sections marked as having no data yield `None`.
fn section_body<'a>(lines: &[&'a str], header: &str, found: &mut usize) -> Option<Vec<&'a str>> {
    let start = lines.iter().position(|line| line.trim() == header)?;
    *found += 1;

    let body: Vec<&str> = lines[start + 1..]
        .iter()
        .copied()
        .map(str::trim)
        .skip_while(|line| is_rule(line))
        .take_while(|line| !line.is_empty() && !line.starts_with('='))
        .collect();

    let first = body.first()?;
    if first.starts_with("No ") && first.ends_with("data available") {
        debug!("Section '{}' has no data", header);
        return None;
    }

    Some(body)
}

/// Split a section body into the id header and labelled rows
///
/// A header row holding numbers is a value row, not ids; the section is
/// skipped rather than inventing implementations named after values.
fn split_table<'a>(body: &[&'a str], header: &str) -> Option<Table<'a>> {
    let (&id_line, rest) = body.split_first()?;

    let ids: Vec<&'a str> = id_line.split_whitespace().collect();
    if let Some(value) = ids.iter().find(|id| looks_numeric(id)) {
        warn!(
            "Section '{}' has value '{}' where implementation ids are expected, skipping",
            header, value
        );
        return None;
    }

    let rows = rest
        .iter()
        .copied()
        .filter_map(|line| {
            let mut cells = line.split_whitespace();
            let label = cells.next()?;
            Some((label, cells.collect()))
        })
        .collect();

    Some(Table { ids, rows })
}

fn looks_numeric(token: &str) -> bool {
    token == ABSENT_CELL || token.parse::<f64>().is_ok()
}

/// Latency written as one `<id> <cycles>` row per implementation,
/// optionally followed by a `Name: ..., dtype: ...` trailer
fn is_series_layout(body: &[&str]) -> bool {
    let has_label_row = body
        .iter()
        .any(|line| line.split_whitespace().next() == Some(LATENCY_ROW_LABEL));

    !has_label_row
        && body
            .iter()
            .filter(|line| !is_series_trailer(line))
            .all(|line| line.split_whitespace().count() == 2)
}

fn is_series_trailer(line: &str) -> bool {
    line.starts_with("Name:")
}

fn is_rule(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '-')
}

/// Pair each cell with its column id, warning on ragged rows
fn cells_by_id<'t, 'a>(
    table: &'t Table<'a>,
    label: &str,
    cells: &'t [&'a str],
) -> impl Iterator<Item = (&'a str, &'a str)> + 't {
    if cells.len() != table.ids.len() {
        warn!(
            "Row '{}' has {} cells for {} implementations",
            label,
            cells.len(),
            table.ids.len()
        );
    }
    table.ids.iter().copied().zip(cells.iter().copied())
}

fn is_absent(cell: &str) -> bool {
    cell == ABSENT_CELL || cell.eq_ignore_ascii_case("nan")
}

fn parse_count(cell: &str) -> Option<u64> {
    if let Ok(n) = cell.parse::<u64>() {
        return Some(n);
    }
    // Integer columns containing gaps may have been written as floats
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Some(f as u64)
        }
        _ => None,
    }
}

fn ensure_columns(records: &mut BTreeMap<String, PartialRecord>, table: &Table<'_>) {
    for id in &table.ids {
        records.entry(id.to_string()).or_default();
    }
}

fn fill_resources(records: &mut BTreeMap<String, PartialRecord>, table: &Table<'_>) {
    ensure_columns(records, table);

    for (kind, cells) in &table.rows {
        for (id, cell) in cells_by_id(table, kind, cells) {
            if is_absent(cell) {
                continue;
            }
            match parse_count(cell) {
                Some(count) => {
                    records
                        .entry(id.to_string())
                        .or_default()
                        .resources
                        .insert(kind.to_string(), count);
                }
                None => warn!("Invalid {} count for {}: '{}'", kind, id, cell),
            }
        }
    }
}

fn fill_timing(records: &mut BTreeMap<String, PartialRecord>, table: &Table<'_>) {
    ensure_columns(records, table);

    for (label, cells) in &table.rows {
        let Ok(stage) = label.parse::<TimingStage>() else {
            warn!("Skipping unknown timing stage '{}'", label);
            continue;
        };

        for (id, cell) in cells_by_id(table, label, cells) {
            if is_absent(cell) {
                continue;
            }
            match cell.parse::<f64>().ok().and_then(period_ns) {
                Some(period) => {
                    records.entry(id.to_string()).or_default().timing.insert(stage, period);
                }
                None => warn!("Invalid {} frequency for {}: '{}'", stage, id, cell),
            }
        }
    }
}

fn fill_latency(records: &mut BTreeMap<String, PartialRecord>, table: &Table<'_>) {
    ensure_columns(records, table);

    let Some((label, cells)) = table.rows.first() else {
        return;
    };

    for (id, cell) in cells_by_id(table, label, cells) {
        if is_absent(cell) {
            continue;
        }
        match parse_count(cell) {
            Some(cycles) => records.entry(id.to_string()).or_default().latency = Some(cycles),
            None => warn!("Invalid latency for {}: '{}'", id, cell),
        }
    }
}

fn fill_latency_series(records: &mut BTreeMap<String, PartialRecord>, body: &[&str]) {
    for line in body.iter().filter(|line| !is_series_trailer(line)) {
        let mut cells = line.split_whitespace();
        let (Some(id), Some(cell)) = (cells.next(), cells.next()) else {
            continue;
        };

        let record = records.entry(id.to_string()).or_default();
        if is_absent(cell) {
            continue;
        }
        match parse_count(cell) {
            Some(cycles) => record.latency = Some(cycles),
            None => warn!("Invalid latency for {}: '{}'", id, cell),
        }
    }
}
