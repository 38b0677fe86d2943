//! Configuration and constants for the analyzer.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Key holding the record array in the trace log document
pub const RECORD_SET_KEY: &str = "RecordSet";

/// Key holding the statement text of a raw trace record
pub const FIELD_STATEMENT: &str = "StatementText";

/// Statements slower than this are counted as slow.
/// The trace does not state its time unit; the value is kept as logged.
pub const SLOW_QUERY_THRESHOLD: u64 = 1000;

/// Clause keywords that can follow FROM/JOIN in truncated statement text
pub const RESERVED_CLAUSE_KEYWORDS: &[&str] = &["SELECT", "WHERE", "GROUP", "ORDER"];

/// Bucket key used when process name or client address is missing
pub const UNKNOWN_KEY: &str = "Unknown";

/// Emit a progress notification every this many records
pub const PROGRESS_INTERVAL: usize = 1000;

/// Default number of slow queries listed in the report
pub const DEFAULT_TOP_SLOW: usize = 10;

/// Largest trace log file the CLI will load (512 MiB)
pub const MAX_INPUT_BYTES: u64 = 512 * 1024 * 1024;
