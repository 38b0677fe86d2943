//! Output JSON schema definitions for analysis reports.
//!
//! This module defines the structure of the payload handed back to callers
//! and written to disk. Schema is versioned to allow future evolution.

use crate::aggregator::{AggregateBucket, QueryStats, QuerySummary, SlowQuery};
use crate::parser::{ParsedRecord, ProcessingStats, RecordError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level analysis payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// False when the document was rejected as a whole
    pub success: bool,

    /// Parsed records in input order (only on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<ParsedRecord>>,

    /// Distinct referenced tables, sorted
    #[serde(default)]
    pub tables: Vec<String>,

    /// Statistics (only on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ReportStats>,

    /// Per-record failures; null when there were none
    #[serde(default)]
    pub errors: Option<Vec<RecordError>>,

    /// Reason the document was rejected (only on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Statistics section of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    /// total_queries, slow_queries, no_index_queries, statement_types,
    /// process_stats, address_stats
    #[serde(flatten)]
    pub queries: QueryStats,

    pub processing_stats: ProcessingStats,

    pub summary: QuerySummary,

    pub top_slow_queries: Vec<SlowQuery>,

    /// Table -> number of records referencing it
    pub table_access: BTreeMap<String, u64>,

    /// Event kind -> number of records
    pub event_counts: BTreeMap<String, u64>,

    /// Plan access method (`Index Scan`, `Natural Scan`, `Other`) -> number of records
    #[serde(default)]
    pub plan_types: BTreeMap<String, u64>,

    /// Minute -> bucket
    pub timeline: BTreeMap<String, AggregateBucket>,
}

impl AnalysisReport {
    /// Number of parsed records carried by the report
    pub fn record_count(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// Number of per-record failures
    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, Vec::len)
    }
}
