use crate::parser::{parse_summary_file, TimingStage};
use crate::utils::config::{
    LATENCY_SECTION_HEADER, RESOURCE_SECTION_HEADER, SUMMARY_FORMAT_VERSION,
    TIMING_SECTION_HEADER,
};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a canonical summary text file
pub fn validate_summary_file(file_path: PathBuf) -> Result<()> {
    println!("Validating summary: {}", file_path.display());

    let doc = parse_summary_file(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    if doc.sections_found == 0 {
        anyhow::bail!("No summary sections found in {}", file_path.display());
    }

    let with_timing = doc.records.values().filter(|r| !r.timing.is_empty()).count();
    let with_latency = doc.records.values().filter(|r| r.latency.is_some()).count();

    println!("✓ Valid summary text");
    match doc.format_version {
        Some(version) => println!("  Format Version: {}", version),
        None => println!("  Format Version: (not declared)"),
    }
    println!("  Sections: {}/3", doc.sections_found);
    println!("  Implementations: {}", doc.records.len());
    println!("  With timing: {}", with_timing);
    println!("  With latency: {}", with_latency);

    Ok(())
}

/// Display summary format information
pub fn display_format(show_details: bool) {
    println!("FPGA Report Studio Summary Format");
    println!("Current Version: {}", SUMMARY_FORMAT_VERSION);
    println!();

    if show_details {
        println!("Sections (in order):");
        println!("  {:<28} - one row per resource kind (counts)", RESOURCE_SECTION_HEADER);
        println!("  {:<28} - one row per timing stage (MHz, 3 decimals)", TIMING_SECTION_HEADER);
        println!("  {:<28} - single Latency row (cycles)", LATENCY_SECTION_HEADER);
        println!();
        println!("Each section: dashed rule, a row of implementation ids,");
        println!("then labelled rows of whitespace-separated cells.");
        println!("Absent values are written as '-'.");
        let stages: Vec<&str> = TimingStage::ALL.iter().map(|s| s.label()).collect();
        println!("Timing stages: {}", stages.join(", "));
    } else {
        println!("Use --show for detailed format information");
    }
}

/// Display version information
pub fn display_version() {
    println!("FPGA Report Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Format: v{}", SUMMARY_FORMAT_VERSION);
    println!();
    println!("Collects and compares FPGA implementation reports.");
}
