//! Report assembly.
//!
//! Combines parsed records, statistics and metrics into the payload returned
//! to callers.

pub mod builder;
pub mod schema;

pub use builder::{analyze_document, build_report, failure_report, AnalysisOptions};
pub use schema::{AnalysisReport, ReportStats};
