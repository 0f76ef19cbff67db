//! Data model for extracted implementation metrics.
//!
//! Absent data is always represented by a missing key or `None`,
//! never by a zero.

use crate::utils::config::NS_TO_MHZ;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named checkpoint at which a clock period is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimingStage {
    #[serde(rename = "Target")]
    Target,
    #[serde(rename = "Post-Synthesis")]
    PostSynthesis,
    #[serde(rename = "Post-Route")]
    PostRoute,
}

impl TimingStage {
    /// All stages in report/display order
    pub const ALL: [TimingStage; 3] = [
        TimingStage::Target,
        TimingStage::PostSynthesis,
        TimingStage::PostRoute,
    ];

    /// Label used both in toolchain reports and in the summary text
    pub fn label(self) -> &'static str {
        match self {
            TimingStage::Target => "Target",
            TimingStage::PostSynthesis => "Post-Synthesis",
            TimingStage::PostRoute => "Post-Route",
        }
    }
}

impl fmt::Display for TimingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimingStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimingStage::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown timing stage: {}", s))
    }
}

/// Which kind of report a contribution came from
///
/// Variant order is merge priority: earlier kinds are fed to the
/// aggregator first and win field conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Toolchain place & route resource/timing report
    ImplReport,
    /// Toolchain simulation latency report
    LatencyReport,
    /// Previously exported canonical summary text
    SummaryText,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::ImplReport => "implementation report",
            SourceKind::LatencyReport => "latency report",
            SourceKind::SummaryText => "summary text",
        };
        f.write_str(name)
    }
}

/// Metrics extracted from a single report file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialRecord {
    /// Resource kind -> utilization count
    pub resources: BTreeMap<String, u64>,

    /// Timing stage -> clock period (ns)
    pub timing: BTreeMap<TimingStage, f64>,

    /// Total cycle count
    pub latency: Option<u64>,
}

impl PartialRecord {
    /// A record carrying only a latency value
    pub fn with_latency(latency: Option<u64>) -> Self {
        Self {
            latency,
            ..Default::default()
        }
    }

    /// True when no field is populated
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.timing.is_empty() && self.latency.is_none()
    }

    /// Number of populated fields
    pub fn field_count(&self) -> usize {
        self.resources.len() + self.timing.len() + usize::from(self.latency.is_some())
    }
}

/// Unified metrics for one implementation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationRecord {
    pub id: String,

    #[serde(default)]
    pub resources: BTreeMap<String, u64>,

    /// Stored as periods; frequencies are derived on demand
    #[serde(default)]
    pub timing: BTreeMap<TimingStage, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,
}

impl ImplementationRecord {
    /// Create an empty record
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resources: BTreeMap::new(),
            timing: BTreeMap::new(),
            latency: None,
        }
    }

    /// Derived frequency (MHz) for a stage, if a positive period is stored
    pub fn frequency_mhz(&self, stage: TimingStage) -> Option<f64> {
        self.timing.get(&stage).copied().and_then(frequency_mhz)
    }

    /// True when no field is populated
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.timing.is_empty() && self.latency.is_none()
    }
}

/// Convert a clock period (ns) to a frequency (MHz)
///
/// Undefined for non-positive or non-finite periods.
pub fn frequency_mhz(period_ns: f64) -> Option<f64> {
    (period_ns.is_finite() && period_ns > 0.0).then(|| NS_TO_MHZ / period_ns)
}

/// Convert a frequency (MHz) back to a clock period (ns)
pub fn period_ns(frequency_mhz: f64) -> Option<f64> {
    (frequency_mhz.is_finite() && frequency_mhz > 0.0).then(|| NS_TO_MHZ / frequency_mhz)
}

/// Aggregated dataset keyed by implementation id
///
/// Keys are kept in lexicographic order, which is also the column order
/// of the summary text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    pub records: BTreeMap<String, ImplementationRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ImplementationRecord> {
        self.records.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImplementationRecord> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_from_period() {
        assert_eq!(frequency_mhz(2.0), Some(500.0));
        assert_eq!(frequency_mhz(4.0), Some(250.0));
        assert_eq!(frequency_mhz(0.0), None);
        assert_eq!(frequency_mhz(-1.0), None);
        assert_eq!(frequency_mhz(f64::NAN), None);
    }

    #[test]
    fn test_period_from_frequency() {
        assert_eq!(period_ns(250.0), Some(4.0));
        assert_eq!(period_ns(0.0), None);
    }

    #[test]
    fn test_timing_stage_parse() {
        assert_eq!("Post-Route".parse::<TimingStage>().unwrap(), TimingStage::PostRoute);
        assert_eq!("post-synthesis".parse::<TimingStage>().unwrap(), TimingStage::PostSynthesis);
        assert!("Post-Place".parse::<TimingStage>().is_err());
    }

    #[test]
    fn test_record_frequency_absent_stage() {
        let mut record = ImplementationRecord::new("implA");
        record.timing.insert(TimingStage::PostRoute, 2.0);

        assert_eq!(record.frequency_mhz(TimingStage::PostRoute), Some(500.0));
        assert_eq!(record.frequency_mhz(TimingStage::Target), None);
    }

    #[test]
    fn test_partial_record_field_count() {
        let mut partial = PartialRecord::with_latency(Some(10));
        partial.resources.insert("LUT".to_string(), 0);
        assert_eq!(partial.field_count(), 2);
        assert!(!partial.is_empty());
        assert!(PartialRecord::default().is_empty());
    }

    #[test]
    fn test_dataset_json_shape() {
        let mut record = ImplementationRecord::new("implA");
        record.resources.insert("LUT".to_string(), 100);
        record.timing.insert(TimingStage::PostRoute, 4.0);

        let mut dataset = Dataset::new();
        dataset.records.insert("implA".to_string(), record);

        let json = serde_json::to_value(&dataset).unwrap();
        assert_eq!(json["implA"]["resources"]["LUT"], 100);
        assert_eq!(json["implA"]["timing"]["Post-Route"], 4.0);
        assert!(json["implA"].get("latency").is_none());
    }
}
