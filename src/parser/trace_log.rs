//! Trace log parser.
//!
//! Validates the document shape, then assembles records one at a time.
//! A malformed record is recorded as a [`RecordError`] and never discards the
//! rest of the batch; only a malformed document aborts.

use super::record::{assemble_record, ParsedRecord, RecordOutcome};
use crate::utils::config::{PROGRESS_INTERVAL, RECORD_SET_KEY};
use crate::utils::error::ParseError;
use crate::utils::observer::ParseObserver;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// A raw entry that could not be assembled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    /// Zero-based position in the record array
    pub record_index: usize,

    /// Human-readable reason
    #[serde(rename = "error")]
    pub message: String,
}

/// Counters describing one parse run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_records: usize,
    pub parsed_records: usize,
    /// Entries without statement text
    pub skipped_records: usize,
    pub error_records: usize,
    pub tables_found: usize,
}

/// Everything produced by a complete parse
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    /// Parsed records in input order
    pub records: Vec<ParsedRecord>,

    /// Distinct referenced tables across the batch
    pub tables: BTreeSet<String>,

    pub errors: Vec<RecordError>,

    pub processing: ProcessingStats,
}

impl ParsedLog {
    /// Append a later partition of the same log
    ///
    /// **Public** - partitions must be merged in their original order
    pub fn merge(&mut self, other: ParsedLog) {
        self.records.extend(other.records);
        self.tables.extend(other.tables);
        self.errors.extend(other.errors);

        self.processing.total_records += other.processing.total_records;
        self.processing.parsed_records += other.processing.parsed_records;
        self.processing.skipped_records += other.processing.skipped_records;
        self.processing.error_records += other.processing.error_records;
        self.processing.tables_found = self.tables.len();
    }
}

/// Validate the top-level shape of a trace log
///
/// **Public** - runs before any record is touched
///
/// # Returns
/// The record array
///
/// # Errors
/// * `ParseError::RootNotObject` - Document is not a JSON object
/// * `ParseError::MissingRecordSet` - `RecordSet` key is absent
/// * `ParseError::RecordSetNotArray` - `RecordSet` is not an array
pub fn validate_trace_log(document: &Value) -> Result<&[Value], ParseError> {
    let root = document.as_object().ok_or(ParseError::RootNotObject)?;

    let records = root
        .get(RECORD_SET_KEY)
        .ok_or(ParseError::MissingRecordSet(RECORD_SET_KEY))?;

    records
        .as_array()
        .map(Vec::as_slice)
        .ok_or(ParseError::RecordSetNotArray(RECORD_SET_KEY))
}

/// Incremental trace log parser
///
/// Holds the table set, error list and counters while the caller consumes
/// parsed records one at a time, so records can be folded into statistics
/// without first collecting the whole batch.
///
/// # Example
/// ```ignore
/// let mut parser = TraceLogParser::new(&LogObserver);
/// let mut stats = QueryStats::default();
/// for raw in records {
///     if let Some(record) = parser.feed(raw) {
///         stats.record(&record);
///     }
/// }
/// let summary = parser.finish();
/// ```
pub struct TraceLogParser<'o> {
    observer: &'o dyn ParseObserver,
    next_index: usize,
    tables: BTreeSet<String>,
    errors: Vec<RecordError>,
    processing: ProcessingStats,
}

/// Parser state left once every record has been fed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseSummary {
    pub tables: BTreeSet<String>,
    pub errors: Vec<RecordError>,
    pub processing: ProcessingStats,
}

impl<'o> TraceLogParser<'o> {
    /// Create a parser starting at record index 0
    pub fn new(observer: &'o dyn ParseObserver) -> Self {
        Self::with_offset(observer, 0)
    }

    /// Create a parser for a partition whose first record has index `offset`
    ///
    /// **Public** - keeps error indices absolute when a log is split
    pub fn with_offset(observer: &'o dyn ParseObserver, offset: usize) -> Self {
        Self {
            observer,
            next_index: offset,
            tables: BTreeSet::new(),
            errors: Vec::new(),
            processing: ProcessingStats::default(),
        }
    }

    /// Process the next raw record
    ///
    /// # Returns
    /// The parsed record, or `None` if it was skipped or failed
    pub fn feed(&mut self, raw: &Value) -> Option<ParsedRecord> {
        let index = self.next_index;
        self.next_index += 1;
        self.processing.total_records += 1;

        let result = match assemble_record(index, raw) {
            RecordOutcome::Parsed(record) => {
                self.tables.extend(record.tables.iter().cloned());
                self.processing.parsed_records += 1;
                Some(record)
            }
            RecordOutcome::Skipped => {
                self.observer.skipped(index);
                self.processing.skipped_records += 1;
                None
            }
            RecordOutcome::Failed(message) => {
                self.observer.warn(index, &message);
                self.errors.push(RecordError {
                    record_index: index,
                    message,
                });
                self.processing.error_records += 1;
                None
            }
        };

        if self.processing.total_records % PROGRESS_INTERVAL == 0 {
            self.observer.progress(self.processing.total_records);
        }

        result
    }

    /// Finish parsing and hand back the accumulated state
    pub fn finish(mut self) -> ParseSummary {
        self.processing.tables_found = self.tables.len();
        self.observer
            .finished(self.processing.parsed_records, self.processing.error_records);

        ParseSummary {
            tables: self.tables,
            errors: self.errors,
            processing: self.processing,
        }
    }
}

/// Parse a complete trace log document
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `document` - Decoded trace log JSON
/// * `observer` - Receives progress and warning events
///
/// # Returns
/// Parsed records in input order with tables, errors and counters
///
/// # Errors
/// Schema errors only (see [`validate_trace_log`]). Per-record failures are
/// returned in `ParsedLog::errors`.
pub fn parse_trace_log(
    document: &Value,
    observer: &dyn ParseObserver,
) -> Result<ParsedLog, ParseError> {
    let records = validate_trace_log(document).inspect_err(|e| observer.error(&e.to_string()))?;

    observer.started(records.len());

    Ok(parse_records(records, 0, observer))
}

/// Parse a slice of raw records whose first element has index `offset`
///
/// **Public** - building block for partitioned parsing
pub fn parse_records(records: &[Value], offset: usize, observer: &dyn ParseObserver) -> ParsedLog {
    let mut parser = TraceLogParser::with_offset(observer, offset);
    let parsed: Vec<ParsedRecord> = records.iter().filter_map(|raw| parser.feed(raw)).collect();
    let summary = parser.finish();

    ParsedLog {
        records: parsed,
        tables: summary.tables,
        errors: summary.errors,
        processing: summary.processing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::observer::NullObserver;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recording {
        started: RefCell<Vec<usize>>,
        progress: RefCell<Vec<usize>>,
        skipped: RefCell<Vec<usize>>,
        warnings: RefCell<Vec<usize>>,
        errors: RefCell<Vec<String>>,
    }

    impl ParseObserver for Recording {
        fn started(&self, total: usize) {
            self.started.borrow_mut().push(total);
        }
        fn progress(&self, processed: usize) {
            self.progress.borrow_mut().push(processed);
        }
        fn skipped(&self, record_index: usize) {
            self.skipped.borrow_mut().push(record_index);
        }
        fn warn(&self, record_index: usize, _message: &str) {
            self.warnings.borrow_mut().push(record_index);
        }
        fn error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        assert!(matches!(
            validate_trace_log(&json!([])),
            Err(ParseError::RootNotObject)
        ));
        assert!(matches!(
            validate_trace_log(&json!({"Other": []})),
            Err(ParseError::MissingRecordSet(_))
        ));
        assert!(matches!(
            validate_trace_log(&json!({"RecordSet": {}})),
            Err(ParseError::RecordSetNotArray(_))
        ));
        assert_eq!(validate_trace_log(&json!({"RecordSet": []})).unwrap().len(), 0);
    }

    #[test]
    fn test_schema_error_reported_to_observer() {
        let observer = Recording::default();
        assert!(parse_trace_log(&json!("text"), &observer).is_err());
        assert_eq!(observer.errors.borrow().len(), 1);
        assert!(observer.started.borrow().is_empty());
    }

    #[test]
    fn test_parse_isolates_bad_records() {
        let doc = json!({"RecordSet": [
            {"StatementText": "SELECT * FROM a"},
            42,
            {"Time": 10},
            {"StatementText": "SELECT * FROM b JOIN a ON 1=1"}
        ]});
        let observer = Recording::default();
        let log = parse_trace_log(&doc, &observer).unwrap();

        assert_eq!(log.records.len(), 2);
        assert_eq!(log.records[0].statement, "SELECT * FROM a");
        assert_eq!(log.errors.len(), 1);
        assert_eq!(log.errors[0].record_index, 1);
        assert_eq!(log.errors[0].message, "Record #2 is not an object");
        assert_eq!(*observer.warnings.borrow(), vec![1]);
        assert_eq!(*observer.skipped.borrow(), vec![2]);
        assert_eq!(*observer.started.borrow(), vec![4]);

        let tables: Vec<_> = log.tables.iter().cloned().collect();
        assert_eq!(tables, vec!["A", "B"]);

        assert_eq!(
            log.processing,
            ProcessingStats {
                total_records: 4,
                parsed_records: 2,
                skipped_records: 1,
                error_records: 1,
                tables_found: 2,
            }
        );
    }

    #[test]
    fn test_progress_notifications() {
        let records: Vec<Value> = (0..2500)
            .map(|i| json!({"StatementText": format!("SELECT {}", i)}))
            .collect();
        let doc = json!({ "RecordSet": records });
        let observer = Recording::default();

        let log = parse_trace_log(&doc, &observer).unwrap();
        assert_eq!(log.records.len(), 2500);
        assert_eq!(*observer.progress.borrow(), vec![1000, 2000]);
    }

    #[test]
    fn test_offset_keeps_indices_absolute() {
        let records = vec![json!({"StatementText": "SELECT 1"}), json!(null)];
        let log = parse_records(&records, 10, &NullObserver);
        assert_eq!(log.errors[0].record_index, 11);
    }

    #[test]
    fn test_merge_partitions_matches_single_pass() {
        let records = vec![
            json!({"StatementText": "SELECT * FROM a"}),
            json!("bad"),
            json!({"StatementText": "SELECT * FROM b"}),
            json!({"Event": "no statement"}),
            json!({"StatementText": "DELETE FROM a"}),
        ];

        let whole = parse_records(&records, 0, &NullObserver);

        let mut merged = parse_records(&records[..2], 0, &NullObserver);
        merged.merge(parse_records(&records[2..], 2, &NullObserver));

        assert_eq!(merged, whole);
    }
}
