//! Summary statistics over parsed records.
//!
//! Every statistic is an additive fold, so partial results computed over
//! disjoint partitions merge into the same value as a single pass.

use super::buckets::{add_to_bucket, merge_buckets, AggregateBucket};
use crate::parser::{statement_type, ParsedRecord};
use crate::utils::config::SLOW_QUERY_THRESHOLD;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Query statistics for a batch of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStats {
    pub total_queries: u64,

    /// Records slower than `SLOW_QUERY_THRESHOLD`
    pub slow_queries: u64,

    /// Records with statement text whose plan shows no index
    pub no_index_queries: u64,

    /// First statement keyword -> occurrences
    pub statement_types: BTreeMap<String, u64>,

    pub process_stats: BTreeMap<String, AggregateBucket>,

    pub address_stats: BTreeMap<String, AggregateBucket>,
}

impl QueryStats {
    /// Fold one record into the statistics
    pub fn record(&mut self, record: &ParsedRecord) {
        self.total_queries += 1;

        if is_slow(record) {
            self.slow_queries += 1;
        }

        if !record.statement.is_empty() {
            if !record.uses_index {
                self.no_index_queries += 1;
            }
            if let Some(kind) = statement_type(&record.statement) {
                *self.statement_types.entry(kind).or_insert(0) += 1;
            }
        }

        add_to_bucket(&mut self.process_stats, &record.process, record);
        add_to_bucket(&mut self.address_stats, &record.client_address, record);
    }

    /// Merge statistics computed over another partition
    pub fn merge(&mut self, other: &QueryStats) {
        self.total_queries += other.total_queries;
        self.slow_queries += other.slow_queries;
        self.no_index_queries += other.no_index_queries;

        for (kind, count) in &other.statement_types {
            *self.statement_types.entry(kind.clone()).or_insert(0) += count;
        }

        merge_buckets(&mut self.process_stats, &other.process_stats);
        merge_buckets(&mut self.address_stats, &other.address_stats);
    }
}

/// True when a record exceeds the slow-query threshold
pub fn is_slow(record: &ParsedRecord) -> bool {
    record.execution_time > SLOW_QUERY_THRESHOLD
}

/// Compute statistics over a record sequence
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `records` - Parsed records (any order)
///
/// # Returns
/// Totals, histograms and per-process / per-address buckets
pub fn compute_stats<'a>(records: impl IntoIterator<Item = &'a ParsedRecord>) -> QueryStats {
    let stats = records
        .into_iter()
        .fold(QueryStats::default(), |mut stats, record| {
            stats.record(record);
            stats
        });

    debug!(
        "Aggregated {} queries ({} slow, {} without index)",
        stats.total_queries, stats.slow_queries, stats.no_index_queries
    );

    stats
}
