//! Trace log parsing.
//!
//! This module handles:
//! - Stripping comments from statement text and extracting table names
//! - Coercing loosely-typed numeric fields
//! - Assembling one normalized record per raw entry
//! - Validating the document and iterating its records

pub mod fields;
pub mod record;
pub mod statement;
pub mod trace_log;

// Re-export main types
pub use fields::{coerce_u64, text_field};
pub use record::{assemble_record, check_index_usage, ParsedRecord, RawRecord, RecordOutcome};
pub use statement::{extract_tables, normalize_statement, statement_type};
pub use trace_log::{
    parse_records, parse_trace_log, validate_trace_log, ParseSummary, ParsedLog, ProcessingStats,
    RecordError, TraceLogParser,
};
