//! Field patterns compiled from the extraction configuration.
//!
//! Built once per run and shared by every extractor call, so report files
//! never recompile regexes.

use crate::utils::config::ExtractConfig;
use log::{debug, warn};
use regex::Regex;

/// Compiled resource and latency field patterns
#[derive(Debug, Clone)]
pub struct ExtractPatterns {
    /// `(kind, KIND:\s*(\d+))` in configured order
    pub(crate) resources: Vec<(String, Regex)>,

    /// `(field, $FIELD = "(\d+)")` in priority order
    pub(crate) latency: Vec<(String, Regex)>,
}

impl ExtractPatterns {
    /// Compile the configured field names
    ///
    /// Names are escaped, so compilation only fails for pathological
    /// names; those are logged and skipped.
    pub fn new(config: &ExtractConfig) -> Self {
        let resources = compile_all(&config.resource_kinds, |kind| {
            format!(r"{}:\s*(\d+)", regex::escape(kind))
        });
        let latency = compile_all(&config.latency_fields, |field| {
            format!(r#"\${} = "(\d+)""#, regex::escape(field))
        });

        debug!(
            "Compiled {} resource and {} latency patterns",
            resources.len(),
            latency.len()
        );

        Self { resources, latency }
    }
}

impl Default for ExtractPatterns {
    fn default() -> Self {
        Self::new(&ExtractConfig::default())
    }
}

fn compile_all<F>(names: &[String], pattern: F) -> Vec<(String, Regex)>
where
    F: Fn(&str) -> String,
{
    names
        .iter()
        .filter_map(|name| match Regex::new(&pattern(name)) {
            Ok(re) => Some((name.clone(), re)),
            Err(e) => {
                warn!("Skipping field with unusable name '{}': {}", name, e);
                None
            }
        })
        .collect()
}
