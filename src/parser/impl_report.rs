//! Extractor for toolchain place & route reports (`export_impl.rpt`).
//!
//! Resource fields are searched only inside the resource summary section.
//! Timing rows are searched in the whole report once the timing table is
//! found, since some report variants repeat the stage labels outside the
//! nominal section.

use super::patterns::ExtractPatterns;
use super::read_report;
use super::schema::{PartialRecord, TimingStage};
use crate::utils::config::{RESOURCE_SUMMARY_MARKER, TIMING_SUMMARY_MARKER};
use crate::utils::error::ExtractError;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

/// Header line through the first blank line
static RESOURCE_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?s){}.*?\n(.*?)\n\n",
        regex::escape(RESOURCE_SUMMARY_MARKER)
    ))
    .expect("resource section pattern is valid")
});

/// Header, a `Target` row, then everything up to the closing `+-` rule
static TIMING_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?s){}.*?\| Target\s*\|\s*[\d.]+\s*\|(.*?)\+-",
        regex::escape(TIMING_SUMMARY_MARKER)
    ))
    .expect("timing section pattern is valid")
});

static TIMING_ROWS: Lazy<Vec<(TimingStage, Regex)>> = Lazy::new(|| {
    TimingStage::ALL
        .into_iter()
        .map(|stage| {
            let pattern = format!(r"\| {}\s*\|\s*([\d.]+)\s*\|", regex::escape(stage.label()));
            let re = Regex::new(&pattern).expect("timing row pattern is valid");
            (stage, re)
        })
        .collect()
});

/// Extract resources and timing from place & route report text
///
/// **Public** - pure function, never fails; missing sections leave the
/// corresponding fields absent.
pub fn extract_impl_report(content: &str, patterns: &ExtractPatterns) -> PartialRecord {
    let content = normalize_newlines(content);

    let resources = extract_resources(&content, &patterns.resources);
    let timing = extract_timing(&content);

    debug!(
        "Extracted {} resource fields and {} timing stages",
        resources.len(),
        timing.len()
    );

    PartialRecord {
        resources,
        timing,
        latency: None,
    }
}

/// Read and extract a place & route report
pub fn extract_impl_report_file(
    path: &Path,
    patterns: &ExtractPatterns,
) -> Result<PartialRecord, ExtractError> {
    let content = read_report(path)?;
    Ok(extract_impl_report(&content, patterns))
}

fn extract_resources(content: &str, patterns: &[(String, Regex)]) -> BTreeMap<String, u64> {
    let mut resources = BTreeMap::new();

    let Some(section) = RESOURCE_SECTION.captures(content).and_then(|c| c.get(1)) else {
        debug!("No resource summary section found");
        return resources;
    };
    let section = section.as_str();

    for (kind, re) in patterns {
        if let Some(value) = re.captures(section).and_then(|c| c.get(1)) {
            match value.as_str().parse::<u64>() {
                Ok(count) => {
                    resources.insert(kind.clone(), count);
                }
                Err(e) => warn!("Invalid {} count '{}': {}", kind, value.as_str(), e),
            }
        }
    }

    resources
}

fn extract_timing(content: &str) -> BTreeMap<TimingStage, f64> {
    let mut timing = BTreeMap::new();

    if !TIMING_SECTION.is_match(content) {
        debug!("No timing summary table found");
        return timing;
    }

    for (stage, re) in TIMING_ROWS.iter() {
        let Some(value) = re.captures(content).and_then(|c| c.get(1)) else {
            continue;
        };

        match value.as_str().parse::<f64>() {
            Ok(period) if period.is_finite() && period > 0.0 => {
                timing.insert(*stage, period);
            }
            Ok(period) => warn!("Ignoring non-positive {} period: {}", stage, period),
            Err(e) => warn!("Invalid {} period '{}': {}", stage, value.as_str(), e),
        }
    }

    timing
}

pub(crate) fn normalize_newlines(content: &str) -> std::borrow::Cow<'_, str> {
    if content.contains('\r') {
        std::borrow::Cow::Owned(content.replace("\r\n", "\n"))
    } else {
        std::borrow::Cow::Borrowed(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::ExtractConfig;
    use pretty_assertions::assert_eq;

    const REPORT: &str = "\
================================================================
== Place & Route Resource Summary
================================================================
LUT:              1234
FF:               2345
DSP:              4
BRAM:             6
URAM:             0
SRL:              12

================================================================
== Place & Route Timing Summary
================================================================
+----------------+-------------+
| Timing         | Period (ns) |
+----------------+-------------+
| Target         | 3.000       |
| Post-Synthesis | 2.750       |
| Post-Route     | 3.120       |
+----------------+-------------+
";

    #[test]
    fn test_extract_full_report() {
        let partial = extract_impl_report(REPORT, &ExtractPatterns::default());

        let expected: BTreeMap<String, u64> = [
            ("LUT", 1234),
            ("FF", 2345),
            ("DSP", 4),
            ("BRAM", 6),
            ("URAM", 0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        assert_eq!(partial.resources, expected);
        assert_eq!(partial.timing.get(&TimingStage::Target), Some(&3.0));
        assert_eq!(partial.timing.get(&TimingStage::PostSynthesis), Some(&2.75));
        assert_eq!(partial.timing.get(&TimingStage::PostRoute), Some(&3.12));
        assert_eq!(partial.latency, None);
    }

    #[test]
    fn test_missing_sections_stay_absent() {
        let partial = extract_impl_report("nothing to see here\n", &ExtractPatterns::default());
        assert!(partial.is_empty());
    }

    #[test]
    fn test_resource_fields_scoped_to_section() {
        let report = "\
== Place & Route Resource Summary
LUT: 10

DSP: 99
";
        let partial = extract_impl_report(report, &ExtractPatterns::default());
        assert_eq!(partial.resources.get("LUT"), Some(&10));
        assert_eq!(partial.resources.get("DSP"), None);
    }

    #[test]
    fn test_timing_rows_searched_in_whole_report() {
        // Post-Route only appears after the closing rule of the table
        let report = "\
== Place & Route Timing Summary
| Target         | 4.000 |
| Post-Synthesis | 3.500 |
+----------------+-------+

Details:
| Post-Route     | 3.900 |
";
        let partial = extract_impl_report(report, &ExtractPatterns::default());
        assert_eq!(partial.timing.len(), 3);
        assert_eq!(partial.timing.get(&TimingStage::PostRoute), Some(&3.9));
    }

    #[test]
    fn test_timing_requires_table() {
        // Stage rows without the timing header are ignored
        let report = "| Post-Route | 3.900 |\n+----+\n";
        let partial = extract_impl_report(report, &ExtractPatterns::default());
        assert!(partial.timing.is_empty());
    }

    #[test]
    fn test_zero_period_dropped() {
        let report = "\
== Place & Route Timing Summary
| Target     | 4.000 |
| Post-Route | 0.000 |
+------------+-------+
";
        let partial = extract_impl_report(report, &ExtractPatterns::default());
        assert_eq!(partial.timing.get(&TimingStage::Target), Some(&4.0));
        assert_eq!(partial.timing.get(&TimingStage::PostRoute), None);
    }

    #[test]
    fn test_crlf_report() {
        let report = REPORT.replace('\n', "\r\n");
        let partial = extract_impl_report(&report, &ExtractPatterns::default());
        assert_eq!(partial.resources.get("LUT"), Some(&1234));
        assert_eq!(partial.timing.len(), 3);
    }

    #[test]
    fn test_custom_resource_kinds() {
        let config = ExtractConfig {
            resource_kinds: vec!["SRL".to_string()],
            ..Default::default()
        };
        let partial = extract_impl_report(REPORT, &ExtractPatterns::new(&config));
        assert_eq!(partial.resources.len(), 1);
        assert_eq!(partial.resources.get("SRL"), Some(&12));
    }
}
