use crate::aggregator::RecordFilter;
use crate::utils::config::DEFAULT_TOP_SLOW;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trace log JSON file
    pub input: PathBuf,

    /// Output path for JSON report
    pub output_json: PathBuf,

    /// Write indented JSON
    pub pretty: bool,

    /// Number of slow queries to rank
    pub top_slow: usize,

    /// Record selection applied before statistics
    pub filter: RecordFilter,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_json: PathBuf::from("report.json"),
            pretty: true,
            top_slow: DEFAULT_TOP_SLOW,
            filter: RecordFilter::default(),
            print_summary: false,
        }
    }
}
