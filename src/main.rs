//! SQL Trace Studio CLI
//!
//! Analyzes database statement trace logs.
//! Extracts referenced tables, flags slow and unindexed queries, and
//! aggregates statistics per process and client address.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use sql_trace_studio::aggregator::RecordFilter;
use sql_trace_studio::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};

/// SQL Trace Studio - statement trace log analysis
#[derive(Parser, Debug)]
#[command(name = "sql-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a trace log file
    Analyze {
        /// Trace log JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Number of slowest queries to rank
        #[arg(long, default_value = "10")]
        top_slow: usize,

        /// Keep only records at least this slow
        #[arg(long)]
        min_time: Option<u64>,

        /// Keep only records with this event kind (repeatable)
        #[arg(long = "event")]
        events: Vec<String>,

        /// Keep only statements starting with this keyword
        #[arg(long)]
        statement_type: Option<String>,

        /// Keep only statements referencing this table
        #[arg(long)]
        table: Option<String>,

        /// Keep only slow queries
        #[arg(long)]
        slow_only: bool,

        /// Keep only queries whose plan does not use an index
        #[arg(long = "no-index")]
        no_index: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            top_slow,
            min_time,
            events,
            statement_type,
            table,
            slow_only,
            no_index,
            compact,
            summary,
        } => {
            let args = AnalyzeArgs {
                input,
                output_json: output,
                pretty: !compact,
                top_slow,
                filter: RecordFilter {
                    min_execution_time: min_time,
                    events,
                    statement_type,
                    table,
                    slow_only,
                    no_index_only: no_index,
                },
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
