//! Per-minute activity timeline.
//!
//! Trace timestamps are opaque strings; the ones chrono can read are
//! truncated to the minute and used as bucket keys. Records whose timestamp
//! is missing or unreadable are left out of the timeline only.

use super::buckets::{add_to_bucket, AggregateBucket};
use crate::parser::ParsedRecord;
use chrono::{DateTime, NaiveDateTime, Timelike};
use log::debug;
use std::collections::BTreeMap;

/// Naive layouts accepted besides RFC 3339
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Bucket key layout
const MINUTE_KEY_FORMAT: &str = "%Y-%m-%dT%H:%M:00";

/// Parse a trace timestamp
///
/// **Public** - accepts RFC 3339 (offset kept as written) or a naive
/// `YYYY-MM-DD[T ]HH:MM:SS[.fff]` value
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Truncate a timestamp to the start of its minute and format it as a key
///
/// **Private** - internal helper for group_by_minute
fn minute_key(timestamp: NaiveDateTime) -> Option<String> {
    let truncated = timestamp.with_second(0)?.with_nanosecond(0)?;
    Some(truncated.format(MINUTE_KEY_FORMAT).to_string())
}

/// Group records into per-minute buckets
///
/// **Public** - provides the timeline of the report
///
/// # Returns
/// Minute key (`YYYY-MM-DDTHH:MM:00`) -> bucket, in chronological order
pub fn group_by_minute(records: &[ParsedRecord]) -> BTreeMap<String, AggregateBucket> {
    let mut timeline = BTreeMap::new();
    let mut unplaced = 0usize;

    for record in records {
        let key = record
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .and_then(minute_key);

        match key {
            Some(key) => add_to_bucket(&mut timeline, &key, record),
            None => unplaced += 1,
        }
    }

    if unplaced > 0 {
        debug!("{} records have no usable timestamp for the timeline", unplaced);
    }

    timeline
}
