//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Per-record failures are not errors here: they are collected as
//! [`RecordError`](crate::parser::RecordError) values and never abort a batch.

use thiserror::Error;

/// Errors that abort parsing of a whole trace log
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid JSON format: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid log format: root must be an object")]
    RootNotObject,

    #[error("Invalid log format: missing {0}")]
    MissingRecordSet(&'static str),

    #[error("Invalid log format: {0} must be an array")]
    RecordSetNotArray(&'static str),
}

impl ParseError {
    /// True when the document decoded but has the wrong shape
    pub fn is_schema_error(&self) -> bool {
        !matches!(self, ParseError::JsonError(_))
    }
}

/// Errors that can occur while reading input or writing reports
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Input is {size} bytes, larger than the {limit} byte limit")]
    InputTooLarge { size: u64, limit: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_messages() {
        assert_eq!(
            ParseError::RootNotObject.to_string(),
            "Invalid log format: root must be an object"
        );
        assert_eq!(
            ParseError::MissingRecordSet("RecordSet").to_string(),
            "Invalid log format: missing RecordSet"
        );
        assert_eq!(
            ParseError::RecordSetNotArray("RecordSet").to_string(),
            "Invalid log format: RecordSet must be an array"
        );
    }

    #[test]
    fn test_is_schema_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!ParseError::JsonError(json_err).is_schema_error());
        assert!(ParseError::RootNotObject.is_schema_error());
    }

    #[test]
    fn test_input_too_large_message() {
        let err = OutputError::InputTooLarge { size: 2048, limit: 1024 };
        assert_eq!(err.to_string(), "Input is 2048 bytes, larger than the 1024 byte limit");
    }
}
