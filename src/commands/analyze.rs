//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads and decodes the trace log file
//! 2. Parses records and aggregates statistics
//! 3. Writes the JSON report
//! 4. Optionally prints a text summary

use super::models::AnalyzeArgs;
use crate::output::{generate_text_summary, write_report};
use crate::report::{analyze_document, failure_report, AnalysisOptions, AnalysisReport};
use crate::utils::config::MAX_INPUT_BYTES;
use crate::utils::error::{OutputError, ParseError};
use crate::utils::observer::LogObserver;
use anyhow::{Context, Result};
use log::{debug, info};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report that was written. A document rejected as a whole still gets a
/// failure report written, and the command then returns an error.
///
/// # Errors
/// * Input file missing, too large or not JSON
/// * Report write errors
/// * Trace log rejected as a whole
pub fn execute_analyze(args: AnalyzeArgs) -> Result<AnalysisReport> {
    let start_time = Instant::now();

    info!("Analyzing trace log: {}", args.input.display());

    info!("Step 1/3: Loading trace log...");
    let report = match load_trace_log(&args.input) {
        Ok(document) => {
            info!("Step 2/3: Parsing and aggregating records...");
            let options = AnalysisOptions {
                filter: args.filter.clone(),
                top_slow: args.top_slow,
            };
            analyze_document(&document, &options, &LogObserver)
        }
        // Undecodable JSON is reported in the payload like a schema error
        Err(LoadError::Decode(e)) => failure_report(e.to_string()),
        Err(LoadError::Io(e)) => {
            return Err(e).context(format!("Failed to load {}", args.input.display()))
        }
    };

    if let Some(stats) = report.stats.as_ref() {
        debug!(
            "{} queries, {} slow, {} without index",
            stats.queries.total_queries, stats.queries.slow_queries, stats.queries.no_index_queries
        );
        info!("Summary: {}", stats.summary.summary());
    }

    info!("Step 3/3: Writing report...");
    write_report(&report, &args.output_json, args.pretty).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!("{}", render_summary(&report, &args));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    if !report.success {
        anyhow::bail!(
            "Trace log rejected: {}",
            report.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(report)
}

/// Why a trace log file could not be loaded
///
/// **Private** - separates I/O problems from undecodable content
enum LoadError {
    Io(OutputError),
    Decode(ParseError),
}

/// Load and decode a trace log file
///
/// **Private** - internal helper for execute_analyze
fn load_trace_log(path: &Path) -> Result<Value, LoadError> {
    let metadata = std::fs::metadata(path).map_err(|e| LoadError::Io(OutputError::ReadFailed(e)))?;

    check_input_size(metadata.len(), MAX_INPUT_BYTES).map_err(LoadError::Io)?;

    let file = File::open(path).map_err(|e| LoadError::Io(OutputError::ReadFailed(e)))?;

    debug!("Decoding {} bytes of JSON", metadata.len());

    serde_json::from_reader(BufReader::new(file)).map_err(|e| LoadError::Decode(ParseError::from(e)))
}

/// Reject inputs larger than `limit` bytes before reading them
///
/// **Private** - internal helper for load_trace_log
fn check_input_size(size: u64, limit: u64) -> Result<(), OutputError> {
    if size > limit {
        return Err(OutputError::InputTooLarge { size, limit });
    }
    Ok(())
}

/// Render the text summary block printed by `--summary`
///
/// **Private** - internal helper for execute_analyze
fn render_summary(report: &AnalysisReport, args: &AnalyzeArgs) -> String {
    let rule = "=".repeat(80);
    format!(
        "\n{rule}\nTRACE LOG SUMMARY\n{rule}\nInput: {}\n\n{}\n{rule}",
        args.input.display(),
        generate_text_summary(report, args.top_slow)
    )
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input file cannot be empty");
    }

    let is_json = args
        .input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        anyhow::bail!("Invalid file type. Please provide a JSON file");
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if args.top_slow > 1000 {
        anyhow::bail!("top_slow is too large (max 1000)");
    }

    if let Some(kind) = &args.filter.statement_type {
        if kind.split_whitespace().count() != 1 {
            anyhow::bail!("Statement type must be a single keyword");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_validate_args_valid() {
        let args = AnalyzeArgs {
            input: PathBuf::from("trace.json"),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_uppercase_extension() {
        let args = AnalyzeArgs {
            input: PathBuf::from("TRACE.JSON"),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_input() {
        assert!(validate_args(&AnalyzeArgs::default()).is_err());
    }

    #[test]
    fn test_validate_args_wrong_extension() {
        let args = AnalyzeArgs {
            input: PathBuf::from("trace.log"),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_top_slow_too_large() {
        let args = AnalyzeArgs {
            input: PathBuf::from("trace.json"),
            top_slow: 5000,
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_execute_analyze_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(
            dir.path(),
            "trace.json",
            r#"{"RecordSet": [{"StatementText": "SELECT * FROM t", "Time": 1500}]}"#,
        );
        let output = dir.path().join("out/report.json");

        let report = execute_analyze(AnalyzeArgs {
            input,
            output_json: output.clone(),
            ..Default::default()
        })
        .unwrap();

        assert!(report.success);
        assert_eq!(report.tables, vec!["T"]);
        assert!(output.exists());
    }

    #[test]
    fn test_execute_analyze_invalid_json_writes_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), "trace.json", "{ not json");
        let output = dir.path().join("report.json");

        let result = execute_analyze(AnalyzeArgs {
            input,
            output_json: output.clone(),
            ..Default::default()
        });

        assert!(result.is_err());
        let written = crate::output::read_report(&output).unwrap();
        assert!(!written.success);
        assert!(written.error.unwrap().starts_with("Invalid JSON format"));
    }

    #[test]
    fn test_input_size_limit() {
        assert!(check_input_size(1024, 1024).is_ok());
        match check_input_size(1025, 1024) {
            Err(OutputError::InputTooLarge { size, limit }) => {
                assert_eq!(size, 1025);
                assert_eq!(limit, 1024);
            }
            other => panic!("expected InputTooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_rows_follow_top_slow() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<String> = (1..=15)
            .map(|i| format!(r#"{{"StatementText": "SELECT {} FROM t", "Time": {}}}"#, i, i * 100))
            .collect();
        let input = write_input(
            dir.path(),
            "trace.json",
            &format!(r#"{{"RecordSet": [{}]}}"#, records.join(",")),
        );
        let args = AnalyzeArgs {
            input,
            output_json: dir.path().join("report.json"),
            top_slow: 12,
            ..Default::default()
        };

        let report = execute_analyze(args.clone()).unwrap();
        let text = render_summary(&report, &args);

        let rows = text.lines().filter(|line| line.contains(" FROM t")).count();
        assert_eq!(rows, 12);
        assert!(text.contains("TRACE LOG SUMMARY"));
    }

    #[test]
    fn test_execute_analyze_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = execute_analyze(AnalyzeArgs {
            input: dir.path().join("absent.json"),
            output_json: dir.path().join("report.json"),
            ..Default::default()
        });
        assert!(result.is_err());
        assert!(!dir.path().join("report.json").exists());
    }
}
