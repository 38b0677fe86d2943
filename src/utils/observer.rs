//! Observability hooks injected into the parser.
//!
//! The parser never touches the global logger directly; it reports through a
//! [`ParseObserver`]. Methods return nothing, so a failing sink cannot change
//! parse results.

use log::{debug, error, info, warn};

/// Receives progress and diagnostic events from the parser
pub trait ParseObserver {
    /// A validated document with `total` raw records is about to be parsed
    fn started(&self, total: usize) {
        let _ = total;
    }

    /// Called every `PROGRESS_INTERVAL` records with the number seen so far
    fn progress(&self, processed: usize);

    /// A record had no statement text and was left out
    fn skipped(&self, record_index: usize) {
        let _ = record_index;
    }

    /// A record could not be assembled and was skipped
    fn warn(&self, record_index: usize, message: &str);

    /// The whole document was rejected
    fn error(&self, message: &str);

    /// Parsing finished
    fn finished(&self, parsed: usize, errors: usize) {
        let _ = (parsed, errors);
    }
}

/// Forwards parser events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ParseObserver for LogObserver {
    fn started(&self, total: usize) {
        debug!("Parsing {} trace records", total);
    }

    fn progress(&self, processed: usize) {
        debug!("Processed {} records so far", processed);
    }

    fn skipped(&self, record_index: usize) {
        debug!("Record {} has no statement text, skipping", record_index);
    }

    fn warn(&self, record_index: usize, message: &str) {
        warn!("Skipping record {}: {}", record_index, message);
    }

    fn error(&self, message: &str) {
        error!("Trace log rejected: {}", message);
    }

    fn finished(&self, parsed: usize, errors: usize) {
        info!("Parsed {} records ({} errors)", parsed, errors);
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ParseObserver for NullObserver {
    fn progress(&self, _processed: usize) {}
    fn warn(&self, _record_index: usize, _message: &str) {}
    fn error(&self, _message: &str) {}
}
