//! Plain-text summary of an analysis report for the terminal.

use crate::report::AnalysisReport;

const STATEMENT_WIDTH: usize = 58;

/// Render a text summary of a report
///
/// **Public** - printed by `analyze --summary`
///
/// # Arguments
/// * `report` - Report to summarize
/// * `max_lines` - Maximum rows per table section
pub fn generate_text_summary(report: &AnalysisReport, max_lines: usize) -> String {
    let mut lines = Vec::new();

    let Some(stats) = report.stats.as_ref() else {
        lines.push("  ANALYSIS FAILED".to_string());
        lines.push(format!("  {}", report.error.as_deref().unwrap_or("unknown error")));
        return lines.join("\n");
    };

    let queries = &stats.queries;
    let processing = &stats.processing_stats;

    lines.push("  QUERY OVERVIEW".to_string());
    lines.push(format!(
        "  Records: {} total | {} parsed | {} skipped | {} errors",
        processing.total_records,
        processing.parsed_records,
        processing.skipped_records,
        processing.error_records
    ));
    lines.push(format!(
        "  Queries: {} | Slow: {} | Without index: {} | Tables: {}",
        queries.total_queries,
        queries.slow_queries,
        queries.no_index_queries,
        report.tables.len()
    ));
    lines.push(format!("  {}", stats.summary.summary()));

    if !queries.statement_types.is_empty() {
        lines.push(String::new());
        lines.push("  STATEMENT TYPES".to_string());
        let mut types: Vec<_> = queries.statement_types.iter().collect();
        types.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (kind, count) in types.into_iter().take(max_lines) {
            lines.push(format!("  {:<20} {:>10}", kind, count));
        }
    }

    if !stats.top_slow_queries.is_empty() {
        lines.push(String::new());
        lines.push("  SLOWEST QUERIES".to_string());
        lines.push(format!("  ┏{}┳{}┓", "━".repeat(STATEMENT_WIDTH + 2), "━".repeat(14)));
        lines.push(format!(
            "  ┃ {:<width$} ┃ {:>12} ┃",
            "Statement",
            "TIME",
            width = STATEMENT_WIDTH
        ));
        lines.push(format!("  ┣{}╋{}┫", "━".repeat(STATEMENT_WIDTH + 2), "━".repeat(14)));
        for slow in stats.top_slow_queries.iter().take(max_lines) {
            lines.push(format!(
                "  ┃ {:<width$} ┃ {:>12} ┃",
                truncate_statement(&slow.statement),
                slow.execution_time,
                width = STATEMENT_WIDTH
            ));
        }
        lines.push(format!("  ┗{}┻{}┛", "━".repeat(STATEMENT_WIDTH + 2), "━".repeat(14)));
    }

    if !queries.process_stats.is_empty() {
        lines.push(String::new());
        lines.push("  BY PROCESS".to_string());
        let mut processes: Vec<_> = queries.process_stats.iter().collect();
        processes.sort_by(|a, b| b.1.duration.cmp(&a.1.duration).then_with(|| a.0.cmp(b.0)));
        for (name, bucket) in processes.into_iter().take(max_lines) {
            lines.push(format!(
                "  {:<30} {:>8} queries {:>12} time {:>10.1} avg {:>10} reads",
                name,
                bucket.count,
                bucket.duration,
                bucket.average_duration(),
                bucket.reads
            ));
        }
    }

    if !stats.plan_types.is_empty() {
        lines.push(String::new());
        lines.push("  PLAN TYPES".to_string());
        for (kind, count) in stats.plan_types.iter().take(max_lines) {
            lines.push(format!("  {:<20} {:>10}", kind, count));
        }
    }

    if let Some(errors) = report.errors.as_ref() {
        lines.push(String::new());
        lines.push(format!("  RECORD ERRORS ({})", errors.len()));
        for error in errors.iter().take(max_lines) {
            lines.push(format!("  #{}: {}", error.record_index, error.message));
        }
    }

    lines.join("\n")
}

/// Fit a statement on one table row
///
/// **Private** - internal helper for generate_text_summary
fn truncate_statement(statement: &str) -> String {
    let flat = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > STATEMENT_WIDTH {
        let head: String = flat.chars().take(STATEMENT_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        flat
    }
}
