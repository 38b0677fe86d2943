//! Assembly of one normalized record from one raw trace entry.
//!
//! A raw entry is read through [`RawRecord`], an explicit shape with one
//! optional field per known key. Defaults are applied here so nothing
//! downstream sees a loosely-typed value.

use super::fields::{coerce_u64, text_field};
use super::statement::extract_tables;
use crate::utils::config::{FIELD_STATEMENT, UNKNOWN_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Raw trace entry as logged by the database engine
///
/// Every field is optional and kept untyped until assembly. Unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, rename = "TimeStamp")]
    pub timestamp: Option<Value>,

    #[serde(default, rename = "Event")]
    pub event: Option<Value>,

    #[serde(default, rename = "StatementText")]
    pub statement: Option<Value>,

    #[serde(default, rename = "StatementPlan")]
    pub plan: Option<Value>,

    #[serde(default, rename = "Time")]
    pub time: Option<Value>,

    #[serde(default, rename = "User")]
    pub user: Option<Value>,

    #[serde(default, rename = "ProcessName")]
    pub process: Option<Value>,

    #[serde(default, rename = "RemoteAddress")]
    pub client_address: Option<Value>,

    #[serde(default, rename = "Reads")]
    pub reads: Option<Value>,

    #[serde(default, rename = "Writes")]
    pub writes: Option<Value>,

    #[serde(default, rename = "Fetches")]
    pub fetches: Option<Value>,
}

/// One normalized statement execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRecord {
    /// Timestamp exactly as logged
    pub timestamp: Option<String>,

    /// Trace event kind
    pub event: String,

    /// Statement text as logged (comments included)
    pub statement: String,

    /// Elapsed time, 0 when missing or unreadable
    pub execution_time: u64,

    /// Execution plan text
    pub plan: String,

    pub user: String,

    /// Issuing process name, "Unknown" when missing
    pub process: String,

    pub reads: u64,
    pub writes: u64,
    pub fetches: u64,

    /// Uppercase names of referenced tables
    pub tables: BTreeSet<String>,

    /// Plan mentions an index
    pub uses_index: bool,

    /// Client address, "Unknown" when missing
    pub client_address: String,
}

/// Result of assembling one raw entry
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// Entry assembled
    Parsed(ParsedRecord),

    /// Entry carries no statement text and is left out of the batch
    Skipped,

    /// Entry could not be assembled
    Failed(String),
}

/// Assemble a normalized record from one raw trace entry
///
/// **Public** - called by the trace log parser for every entry
///
/// # Arguments
/// * `index` - Zero-based position of the entry, used in failure messages
/// * `raw` - The entry as decoded from JSON
///
/// # Returns
/// `Parsed` on success, `Skipped` when there is no statement text,
/// `Failed` when the entry is not an object or has an unusable statement.
pub fn assemble_record(index: usize, raw: &Value) -> RecordOutcome {
    if !raw.is_object() {
        return RecordOutcome::Failed(format!("Record #{} is not an object", index + 1));
    }

    let raw = match RawRecord::deserialize(raw) {
        Ok(record) => record,
        Err(e) => return RecordOutcome::Failed(format!("Record #{}: {}", index + 1, e)),
    };

    let statement = match raw.statement {
        None => return RecordOutcome::Skipped,
        Some(Value::String(s)) => s,
        Some(other) => {
            return RecordOutcome::Failed(format!(
                "Record #{}: {} must be a string, found {}",
                index + 1,
                FIELD_STATEMENT,
                json_type_name(&other)
            ))
        }
    };

    let plan = text_field(raw.plan.as_ref()).unwrap_or_default();
    let tables = extract_tables(&statement);
    let uses_index = check_index_usage(&plan);

    RecordOutcome::Parsed(ParsedRecord {
        timestamp: text_field(raw.timestamp.as_ref()),
        event: text_field(raw.event.as_ref()).unwrap_or_default(),
        statement,
        execution_time: coerce_u64(raw.time.as_ref(), 0),
        plan,
        user: text_field(raw.user.as_ref()).unwrap_or_default(),
        process: text_field(raw.process.as_ref()).unwrap_or_else(|| UNKNOWN_KEY.to_string()),
        reads: coerce_u64(raw.reads.as_ref(), 0),
        writes: coerce_u64(raw.writes.as_ref(), 0),
        fetches: coerce_u64(raw.fetches.as_ref(), 0),
        tables,
        uses_index,
        client_address: text_field(raw.client_address.as_ref())
            .unwrap_or_else(|| UNKNOWN_KEY.to_string()),
    })
}

/// Heuristic index detection: the plan text mentions INDEX
///
/// **Public** - not a plan parser; a plan naming an index it then skips still
/// counts as using one
pub fn check_index_usage(plan: &str) -> bool {
    !plan.is_empty() && plan.to_uppercase().contains("INDEX")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(raw: Value) -> ParsedRecord {
        match assemble_record(0, &raw) {
            RecordOutcome::Parsed(record) => record,
            other => panic!("expected parsed record, got {:?}", other),
        }
    }

    #[test]
    fn test_assemble_full_record() {
        let record = parsed(json!({
            "TimeStamp": "2024-03-01T10:15:30",
            "Event": "EXECUTE_STATEMENT_FINISH",
            "StatementText": "SELECT * FROM orders WHERE id = 1",
            "StatementPlan": "PLAN (ORDERS INDEX (PK_ORDERS))",
            "Time": "250.9",
            "User": "SYSDBA",
            "ProcessName": "app.exe",
            "RemoteAddress": "10.0.0.5",
            "Reads": 12,
            "Writes": "3",
            "Fetches": 40.0
        }));

        assert_eq!(record.timestamp.as_deref(), Some("2024-03-01T10:15:30"));
        assert_eq!(record.event, "EXECUTE_STATEMENT_FINISH");
        assert_eq!(record.execution_time, 250);
        assert_eq!(record.user, "SYSDBA");
        assert_eq!(record.process, "app.exe");
        assert_eq!(record.client_address, "10.0.0.5");
        assert_eq!((record.reads, record.writes, record.fetches), (12, 3, 40));
        assert!(record.tables.contains("ORDERS"));
        assert!(record.uses_index);
    }

    #[test]
    fn test_assemble_defaults() {
        let record = parsed(json!({ "StatementText": "" }));

        assert_eq!(record.timestamp, None);
        assert_eq!(record.event, "");
        assert_eq!(record.statement, "");
        assert_eq!(record.execution_time, 0);
        assert_eq!(record.process, "Unknown");
        assert_eq!(record.client_address, "Unknown");
        assert!(record.tables.is_empty());
        assert!(!record.uses_index);
    }

    #[test]
    fn test_missing_statement_is_skipped() {
        assert_eq!(assemble_record(0, &json!({ "Time": 5 })), RecordOutcome::Skipped);
        assert_eq!(
            assemble_record(0, &json!({ "StatementText": null })),
            RecordOutcome::Skipped
        );
    }

    #[test]
    fn test_non_object_fails() {
        assert_eq!(
            assemble_record(2, &json!("oops")),
            RecordOutcome::Failed("Record #3 is not an object".to_string())
        );
        assert!(matches!(assemble_record(0, &json!([1, 2])), RecordOutcome::Failed(_)));
    }

    #[test]
    fn test_non_string_statement_fails() {
        let outcome = assemble_record(0, &json!({ "StatementText": 42 }));
        match outcome {
            RecordOutcome::Failed(message) => assert!(message.contains("must be a string")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_check_index_usage() {
        assert!(check_index_usage("plan (t index (ix_a))"));
        assert!(!check_index_usage("PLAN (T NATURAL)"));
        assert!(!check_index_usage(""));
    }
}
