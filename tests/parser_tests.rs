use fpga_report_studio::parser::{
    extract_impl_report, extract_impl_report_file, extract_latency_report, parse_summary_text,
    read_report, ExtractPatterns, TimingStage,
};
use fpga_report_studio::utils::config::ExtractConfig;
use fpga_report_studio::utils::error::ExtractError;
use pretty_assertions::assert_eq;
use std::fs;

const VIVADO_REPORT: &str = "\
Implementation tool: Xilinx Vivado v.2023.2
Project:             proj_peakPicker
Solution:            solution1
Device target:       xczu9eg-ffvb1156-2-e

#=== Post-Implementation Resource usage ===
SLICE:            0
LUT:           3127
FF:            4380
DSP:              2
BRAM:             4
URAM:             0
LATCH:            0
SRL:            106
CLB:            647

#=== Final timing ===
CP required:                     3.330
CP achieved post-synthesis:      2.457
CP achieved post-implementation: 3.105
Timing met

================================================================
== Place & Route Resource Summary
================================================================
LUT:              3127
FF:               4380
DSP:              2
BRAM:             4
URAM:             0
SRL:              106

================================================================
== Place & Route Timing Summary
================================================================
+----------------+-------------+
| Timing         | Period (ns) |
+----------------+-------------+
| Target         | 3.330       |
| Post-Synthesis | 2.457       |
| Post-Route     | 3.105       |
+----------------+-------------+
";

#[test]
fn test_vivado_report() {
    let partial = extract_impl_report(VIVADO_REPORT, &ExtractPatterns::default());

    assert_eq!(partial.resources.get("LUT"), Some(&3127));
    assert_eq!(partial.resources.get("FF"), Some(&4380));
    assert_eq!(partial.resources.get("DSP"), Some(&2));
    assert_eq!(partial.resources.get("BRAM"), Some(&4));
    assert_eq!(partial.resources.get("URAM"), Some(&0));
    assert_eq!(partial.resources.len(), 5);

    assert_eq!(partial.timing.get(&TimingStage::Target), Some(&3.33));
    assert_eq!(partial.timing.get(&TimingStage::PostSynthesis), Some(&2.457));
    assert_eq!(partial.timing.get(&TimingStage::PostRoute), Some(&3.105));
    assert_eq!(partial.latency, None);
}

#[test]
fn test_report_without_timing_table() {
    let report = "\
== Place & Route Resource Summary
LUT: 100
FF: 50

CP achieved post-implementation: 3.105
";
    let partial = extract_impl_report(report, &ExtractPatterns::default());

    assert_eq!(partial.resources.len(), 2);
    assert!(partial.timing.is_empty());
}

#[test]
fn test_missing_resource_kinds_are_not_zero() {
    let report = "== Place & Route Resource Summary\nLUT: 100\n\n";
    let partial = extract_impl_report(report, &ExtractPatterns::default());

    assert_eq!(partial.resources.len(), 1);
    assert!(!partial.resources.contains_key("BRAM"));
    assert!(!partial.resources.contains_key("FF"));
}

#[test]
fn test_latency_report() {
    let report = "\
$MAX_LATENCY = \"4107\"
$MIN_LATENCY = \"4107\"
$AVG_LATENCY = \"4107\"
$MAX_II = \"4108\"
";
    assert_eq!(extract_latency_report(report, &ExtractPatterns::default()), Some(4107));
}

#[test]
fn test_latency_custom_field() {
    let config = ExtractConfig {
        latency_fields: vec!["AVG_LATENCY".to_string()],
        ..Default::default()
    };
    let report = "$MAX_LATENCY = \"5\"\n$AVG_LATENCY = \"3\"\n";
    assert_eq!(extract_latency_report(report, &ExtractPatterns::new(&config)), Some(3));
}

#[test]
fn test_read_report_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_report(&dir.path().join("export_impl.rpt"));
    assert!(matches!(result, Err(ExtractError::Io { .. })));
}

#[test]
fn test_read_report_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export_impl.rpt");
    fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

    let result = extract_impl_report_file(&path, &ExtractPatterns::default());
    assert!(matches!(result, Err(ExtractError::Io { .. })));
}

#[test]
fn test_summary_from_older_writer() {
    // Older exports: no format version, float counts where a column has
    // gaps, zero MHz for undefined timing, latency as one row per id
    let text = "\
===============================================
FPGA Implementation Report Summary
Generated on: 2024-05-13 10:22:41.123456
===============================================

RESOURCE UTILIZATION SUMMARY:
-----------------------------
      origin  perf_opt1
LUT   3127.0     2990.0
BRAM     NaN        4.0

TIMING SUMMARY (MHz):
--------------------
                 origin  perf_opt1
Target          300.300    300.300
Post-Synthesis  406.999      0.000
Post-Route      322.061        NaN

LATENCY SUMMARY (cycles):
------------------------
origin       4107
perf_opt1    2055

===============================================
End of Report
===============================================
";
    let doc = parse_summary_text(text);

    assert_eq!(doc.format_version, None);
    assert_eq!(doc.sections_found, 3);
    assert_eq!(doc.records.keys().collect::<Vec<_>>(), vec!["origin", "perf_opt1"]);

    let origin = &doc.records["origin"];
    assert_eq!(origin.resources.get("LUT"), Some(&3127));
    assert_eq!(origin.resources.get("BRAM"), None);
    let post_route = origin.timing[&TimingStage::PostRoute];
    assert!((post_route - 3.105).abs() < 1e-3);
    assert_eq!(origin.latency, Some(4107));

    let opt = &doc.records["perf_opt1"];
    assert_eq!(opt.resources.get("BRAM"), Some(&4));
    assert!(!opt.timing.contains_key(&TimingStage::PostSynthesis));
    assert!(!opt.timing.contains_key(&TimingStage::PostRoute));
    assert_eq!(opt.latency, Some(2055));
}

#[test]
fn test_summary_latency_series_with_trailer() {
    let text = "\
LATENCY SUMMARY (cycles):
------------------------
implA    1234
implB    5678
Name: Latency, dtype: int64
";
    let doc = parse_summary_text(text);

    assert!(!doc.records.contains_key("1234"));
    assert_eq!(doc.records["implA"].latency, Some(1234));
    assert_eq!(doc.records["implB"].latency, Some(5678));
}
