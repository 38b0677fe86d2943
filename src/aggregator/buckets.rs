//! Additive per-key execution buckets.

use crate::parser::ParsedRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running totals for every record sharing a key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateBucket {
    pub count: u64,

    /// Sum of execution times
    pub duration: u64,

    pub reads: u64,
    pub writes: u64,
    pub fetches: u64,
}

impl AggregateBucket {
    /// Fold one record into the bucket
    pub fn add_record(&mut self, record: &ParsedRecord) {
        self.count += 1;
        self.duration = self.duration.saturating_add(record.execution_time);
        self.reads = self.reads.saturating_add(record.reads);
        self.writes = self.writes.saturating_add(record.writes);
        self.fetches = self.fetches.saturating_add(record.fetches);
    }

    /// Pointwise addition of another bucket
    pub fn merge(&mut self, other: &AggregateBucket) {
        self.count += other.count;
        self.duration = self.duration.saturating_add(other.duration);
        self.reads = self.reads.saturating_add(other.reads);
        self.writes = self.writes.saturating_add(other.writes);
        self.fetches = self.fetches.saturating_add(other.fetches);
    }

    /// Mean execution time, 0 for an empty bucket
    pub fn average_duration(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.duration as f64 / self.count as f64
        }
    }
}

/// Add `record` to the bucket under `key`, creating it on first use
pub fn add_to_bucket(buckets: &mut BTreeMap<String, AggregateBucket>, key: &str, record: &ParsedRecord) {
    match buckets.get_mut(key) {
        Some(bucket) => bucket.add_record(record),
        None => {
            let mut bucket = AggregateBucket::default();
            bucket.add_record(record);
            buckets.insert(key.to_string(), bucket);
        }
    }
}

/// Merge every bucket of `other` into `into`
pub fn merge_buckets(
    into: &mut BTreeMap<String, AggregateBucket>,
    other: &BTreeMap<String, AggregateBucket>,
) {
    for (key, bucket) in other {
        into.entry(key.clone()).or_default().merge(bucket);
    }
}
