use crate::output::read_report;
use crate::utils::config::{SCHEMA_VERSION, SLOW_QUERY_THRESHOLD};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Success: {}", report.success);

    match report.stats.as_ref() {
        Some(stats) => {
            println!("  Records: {}", report.record_count());
            println!("  Tables: {}", report.tables.len());
            println!("  Slow Queries: {}", stats.queries.slow_queries);
            println!("  Queries Without Index: {}", stats.queries.no_index_queries);
            println!("  Record Errors: {}", report.error_count());
        }
        None => {
            println!("  Error: {}", report.error.as_deref().unwrap_or("unknown"));
        }
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("SQL Trace Studio Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Input Structure:");
        println!("  RecordSet: array          - Trace records");
        println!("    TimeStamp, Event, StatementText, StatementPlan, Time, User,");
        println!("    ProcessName, RemoteAddress, Reads, Writes, Fetches");
        println!();
        println!("Report Structure:");
        println!("  version: string           - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string      - ISO 8601 timestamp");
        println!("  success: bool             - False when the log was rejected");
        println!("  data: array               - Parsed records in input order");
        println!("  tables: array             - Referenced tables, sorted");
        println!("  stats: object");
        println!("    total_queries: number");
        println!("    slow_queries: number    - Time > {}", SLOW_QUERY_THRESHOLD);
        println!("    no_index_queries: number");
        println!("    statement_types: object - Keyword -> count");
        println!("    process_stats: object   - Process -> bucket");
        println!("    address_stats: object   - Client address -> bucket");
        println!("    processing_stats: object");
        println!("    summary: object         - Durations, I/O totals, index usage");
        println!("    top_slow_queries: array");
        println!("    table_access: object    - Table -> record count");
        println!("    event_counts: object    - Event -> record count");
        println!("    plan_types: object      - Index Scan / Natural Scan / Other -> record count");
        println!("    timeline: object        - Minute -> bucket");
        println!("  errors: array | null      - {{record_index, error}}");
        println!("  error: string             - Rejection reason (failure only)");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("SQL Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Statement trace log analysis for database engines.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::write_report;
    use crate::report::failure_report;

    #[test]
    fn test_validate_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&failure_report("missing RecordSet"), &path, true).unwrap();

        assert!(validate_report_file(path).is_ok());
    }

    #[test]
    fn test_validate_report_file_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(validate_report_file(path).is_err());
    }
}
