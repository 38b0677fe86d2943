//! SQL Trace Studio
//!
//! Analysis of database statement trace logs.
//!
//! Turns a trace log document (`{"RecordSet": [...]}`) into normalized
//! per-statement records with referenced tables, slow-query and
//! missing-index flags, and statistics grouped by process and client
//! address.
//!
//! ## Getting Started
//!
//! ```bash
//! sql-trace analyze --input trace.json --output report.json --summary
//! ```
//!
//! From code:
//!
//! ```ignore
//! use sql_trace_studio::report::{analyze_document, AnalysisOptions};
//! use sql_trace_studio::utils::LogObserver;
//!
//! let report = analyze_document(&document, &AnalysisOptions::default(), &LogObserver);
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;
