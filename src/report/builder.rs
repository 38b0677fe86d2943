//! Turn a parsed trace log into an analysis report.

use super::schema::{AnalysisReport, ReportStats};
use crate::aggregator::{
    calculate_query_summary, compute_stats, event_counts, group_by_minute, plan_types,
    table_access_counts, top_slow_queries, RecordFilter,
};
use crate::parser::{parse_trace_log, ParsedLog};
use crate::utils::config::{DEFAULT_TOP_SLOW, SCHEMA_VERSION};
use crate::utils::observer::ParseObserver;
use chrono::Utc;
use log::debug;
use serde_json::Value;

/// Options controlling report contents
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Records kept for data and statistics
    pub filter: RecordFilter,

    /// Length of the slow query ranking
    pub top_slow: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            filter: RecordFilter::default(),
            top_slow: DEFAULT_TOP_SLOW,
        }
    }
}

/// Analyze a decoded trace log document
///
/// **Public** - main entry point of the library
///
/// # Arguments
/// * `document` - Decoded JSON document
/// * `options` - Filter and ranking options
/// * `observer` - Receives progress and warning events
///
/// # Returns
/// A successful report, or a failure report carrying the schema error
/// message. Record-level failures appear in `errors` of a successful report;
/// an empty batch is still a success.
pub fn analyze_document(
    document: &Value,
    options: &AnalysisOptions,
    observer: &dyn ParseObserver,
) -> AnalysisReport {
    match parse_trace_log(document, observer) {
        Ok(log) => build_report(log, options),
        Err(e) => failure_report(e.to_string()),
    }
}

/// Build a successful report from a parsed log
///
/// **Public** - used when parsing was driven by the caller
///
/// The filter narrows `data` and every statistic; `tables` always lists the
/// tables of the whole batch.
pub fn build_report(log: ParsedLog, options: &AnalysisOptions) -> AnalysisReport {
    let ParsedLog {
        records,
        tables,
        errors,
        processing,
    } = log;

    let records = options.filter.apply(records);

    debug!("Building report from {} records", records.len());

    let stats = ReportStats {
        queries: compute_stats(&records),
        processing_stats: processing,
        summary: calculate_query_summary(&records),
        top_slow_queries: top_slow_queries(&records, options.top_slow),
        table_access: table_access_counts(&records),
        event_counts: event_counts(&records),
        plan_types: plan_types(&records),
        timeline: group_by_minute(&records),
    };

    AnalysisReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        success: true,
        data: Some(records),
        tables: tables.into_iter().collect(),
        stats: Some(stats),
        errors: if errors.is_empty() { None } else { Some(errors) },
        error: None,
    }
}

/// Build a failure report carrying one message
pub fn failure_report(message: impl Into<String>) -> AnalysisReport {
    AnalysisReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        success: false,
        data: None,
        tables: Vec::new(),
        stats: None,
        errors: None,
        error: Some(message.into()),
    }
}
