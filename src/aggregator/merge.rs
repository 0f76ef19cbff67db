//! Merge partial records into one record per implementation.
//!
//! Merge policy is a field-level union with first-writer-wins per field:
//! a resource kind, a timing stage or the latency value is set by the
//! first contribution that carries it, and later values for the same field
//! are ignored. Callers control precedence by the order they feed sources.

use crate::parser::schema::{Dataset, ImplementationRecord, PartialRecord, SourceKind};
use log::debug;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Counters describing one aggregation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Contributions merged
    pub contributions: usize,

    /// Records created
    pub records_created: usize,

    /// Fields written
    pub fields_written: usize,

    /// Fields skipped because an earlier source already supplied them
    pub fields_ignored: usize,
}

impl MergeStats {
    /// Human-readable summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Contributions: {} | Implementations: {} | Fields: {} written, {} ignored",
            self.contributions, self.records_created, self.fields_written, self.fields_ignored
        )
    }
}

/// Single-threaded reducer over `(id, partial, source)` contributions
#[derive(Debug, Default)]
pub struct Aggregator {
    records: BTreeMap<String, ImplementationRecord>,
    stats: MergeStats,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one contribution
    ///
    /// The record for `id` is created even when `partial` is empty, so an
    /// implementation with no usable data still shows up in the output.
    pub fn merge(&mut self, id: &str, partial: PartialRecord, source: SourceKind) {
        self.stats.contributions += 1;
        debug!("{}: {} fields from {}", id, partial.field_count(), source);

        let record = match self.records.entry(id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("New implementation '{}' from {}", id, source);
                self.stats.records_created += 1;
                entry.insert(ImplementationRecord::new(id))
            }
        };

        for (kind, count) in partial.resources {
            match record.resources.entry(kind) {
                Entry::Vacant(slot) => {
                    slot.insert(count);
                    self.stats.fields_written += 1;
                }
                Entry::Occupied(existing) => {
                    self.stats.fields_ignored += 1;
                    if *existing.get() != count {
                        debug!(
                            "{}: keeping {} = {}, ignoring {} from {}",
                            id,
                            existing.key(),
                            existing.get(),
                            count,
                            source
                        );
                    }
                }
            }
        }

        for (stage, period) in partial.timing {
            match record.timing.entry(stage) {
                Entry::Vacant(slot) => {
                    slot.insert(period);
                    self.stats.fields_written += 1;
                }
                Entry::Occupied(existing) => {
                    self.stats.fields_ignored += 1;
                    if *existing.get() != period {
                        debug!(
                            "{}: keeping {} period {} ns, ignoring {} ns from {}",
                            id,
                            stage,
                            existing.get(),
                            period,
                            source
                        );
                    }
                }
            }
        }

        if let Some(latency) = partial.latency {
            match record.latency {
                None => {
                    record.latency = Some(latency);
                    self.stats.fields_written += 1;
                }
                Some(existing) => {
                    self.stats.fields_ignored += 1;
                    if existing != latency {
                        debug!(
                            "{}: keeping latency {}, ignoring {} from {}",
                            id, existing, latency, source
                        );
                    }
                }
            }
        }
    }

    /// Merge a batch of contributions in order
    pub fn merge_all<I>(&mut self, contributions: I)
    where
        I: IntoIterator<Item = Contribution>,
    {
        for c in contributions {
            self.merge(&c.id, c.partial, c.source);
        }
    }

    /// Finish the run and hand out the dataset
    pub fn finish(self) -> (Dataset, MergeStats) {
        (
            Dataset {
                records: self.records,
            },
            self.stats,
        )
    }
}

/// One extracted report, ready to merge
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub id: String,
    pub partial: PartialRecord,
    pub source: SourceKind,
}

impl Contribution {
    pub fn new(id: impl Into<String>, partial: PartialRecord, source: SourceKind) -> Self {
        Self {
            id: id.into(),
            partial,
            source,
        }
    }
}
