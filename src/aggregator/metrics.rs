//! Derived performance metrics over parsed records.
//!
//! Slow queries are the primary targets for tuning; table access counts and
//! the index usage rate point at where an index is missing.

use crate::parser::ParsedRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Headline numbers for a batch of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySummary {
    /// Sum of execution times
    pub total_duration: u64,

    /// Mean execution time
    pub average_duration: f64,

    /// Slowest single execution
    pub max_duration: u64,

    pub total_reads: u64,
    pub total_writes: u64,
    pub total_fetches: u64,

    /// Percentage of records with statement text whose plan uses an index
    pub index_usage_rate: f64,
}

impl QuerySummary {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Total time: {} | Avg: {:.1} | Max: {} | Reads: {} | Writes: {} | Fetches: {} | Index usage: {:.1}%",
            self.total_duration,
            self.average_duration,
            self.max_duration,
            self.total_reads,
            self.total_writes,
            self.total_fetches,
            self.index_usage_rate
        )
    }
}

/// One entry of the slow query ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlowQuery {
    /// Position of the record in the parsed sequence
    pub record_index: usize,

    pub statement: String,

    pub execution_time: u64,

    pub tables: BTreeSet<String>,
}

/// Calculate headline metrics
///
/// **Public** - main entry point for summary metrics
pub fn calculate_query_summary(records: &[ParsedRecord]) -> QuerySummary {
    if records.is_empty() {
        return QuerySummary::default();
    }

    let mut summary = QuerySummary::default();
    let mut with_statement = 0u64;
    let mut with_index = 0u64;

    for record in records {
        summary.total_duration = summary.total_duration.saturating_add(record.execution_time);
        summary.max_duration = summary.max_duration.max(record.execution_time);
        summary.total_reads = summary.total_reads.saturating_add(record.reads);
        summary.total_writes = summary.total_writes.saturating_add(record.writes);
        summary.total_fetches = summary.total_fetches.saturating_add(record.fetches);

        if !record.statement.is_empty() {
            with_statement += 1;
            if record.uses_index {
                with_index += 1;
            }
        }
    }

    summary.average_duration = summary.total_duration as f64 / records.len() as f64;
    summary.index_usage_rate = if with_statement > 0 {
        (with_index as f64 / with_statement as f64) * 100.0
    } else {
        0.0
    };

    summary
}

/// Rank the slowest queries
///
/// **Public** - provides the slow query table of the report
///
/// # Arguments
/// * `records` - Parsed records in input order
/// * `limit` - Number of entries to return
///
/// # Returns
/// Records with a non-zero execution time, slowest first; ties keep input order
pub fn top_slow_queries(records: &[ParsedRecord], limit: usize) -> Vec<SlowQuery> {
    debug!("Ranking top {} slow queries from {} records", limit, records.len());

    let mut ranked: Vec<(usize, &ParsedRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.execution_time > 0)
        .collect();

    // Stable sort keeps input order among equal times
    ranked.sort_by(|a, b| b.1.execution_time.cmp(&a.1.execution_time));

    ranked
        .into_iter()
        .take(limit)
        .map(|(record_index, record)| SlowQuery {
            record_index,
            statement: record.statement.clone(),
            execution_time: record.execution_time,
            tables: record.tables.clone(),
        })
        .collect()
}

/// Count how many records reference each table
pub fn table_access_counts(records: &[ParsedRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for table in records.iter().flat_map(|r| r.tables.iter()) {
        *counts.entry(table.clone()).or_insert(0) += 1;
    }
    counts
}

/// Count records per trace event kind, ignoring records without one
pub fn event_counts(records: &[ParsedRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for record in records.iter().filter(|r| !r.event.is_empty()) {
        *counts.entry(record.event.clone()).or_insert(0) += 1;
    }
    counts
}

/// Classify an execution plan by its access method
///
/// **Private** - internal helper for plan_types
fn plan_kind(plan: &str) -> &'static str {
    let upper = plan.to_uppercase();
    if upper.contains("INDEX") {
        "Index Scan"
    } else if upper.contains("NATURAL") {
        "Natural Scan"
    } else {
        "Other"
    }
}

/// Count records per plan access method
///
/// **Public** - provides the plan type distribution of the report
///
/// # Returns
/// Counts keyed by `Index Scan`, `Natural Scan` or `Other`. Records with an
/// empty plan are not counted; a plan naming both an index and a natural
/// scan counts as an index scan.
pub fn plan_types(records: &[ParsedRecord]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for record in records.iter().filter(|r| !r.plan.is_empty()) {
        *counts.entry(plan_kind(&record.plan).to_string()).or_insert(0) += 1;
    }
    counts
}
