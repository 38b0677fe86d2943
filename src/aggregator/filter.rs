//! Record selection before aggregation.

use crate::aggregator::stats::is_slow;
use crate::parser::{statement_type, ParsedRecord};
use log::debug;

/// Criteria a record must satisfy to be kept
///
/// Every criterion is optional; a record is kept when it satisfies all of the
/// ones that are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Keep records at least this slow
    pub min_execution_time: Option<u64>,

    /// Keep records whose event kind is listed (exact match)
    pub events: Vec<String>,

    /// Keep records whose first statement keyword matches (case-insensitive)
    pub statement_type: Option<String>,

    /// Keep records referencing this table (case-insensitive)
    pub table: Option<String>,

    /// Keep only slow queries (see `SLOW_QUERY_THRESHOLD`)
    pub slow_only: bool,

    /// Keep only records whose plan does not use an index
    pub no_index_only: bool,
}

impl RecordFilter {
    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.min_execution_time.is_none()
            && self.events.is_empty()
            && self.statement_type.is_none()
            && self.table.is_none()
            && !self.slow_only
            && !self.no_index_only
    }

    /// Check one record against every criterion
    pub fn matches(&self, record: &ParsedRecord) -> bool {
        if let Some(min) = self.min_execution_time {
            if record.execution_time < min {
                return false;
            }
        }

        if self.slow_only && !is_slow(record) {
            return false;
        }

        if self.no_index_only && record.uses_index {
            return false;
        }

        if !self.events.is_empty() && !self.events.iter().any(|e| *e == record.event) {
            return false;
        }

        if let Some(wanted) = &self.statement_type {
            match statement_type(&record.statement) {
                Some(kind) if kind.eq_ignore_ascii_case(wanted) => {}
                _ => return false,
            }
        }

        if let Some(table) = &self.table {
            if !record.tables.contains(&table.to_uppercase()) {
                return false;
            }
        }

        true
    }

    /// Keep the matching records, preserving order
    pub fn apply(&self, records: Vec<ParsedRecord>) -> Vec<ParsedRecord> {
        if self.is_empty() {
            return records;
        }

        let before = records.len();
        let kept: Vec<ParsedRecord> = records.into_iter().filter(|r| self.matches(r)).collect();
        debug!("Filter kept {} of {} records", kept.len(), before);
        kept
    }
}
