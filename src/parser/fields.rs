//! Coercion of loosely-typed trace fields.
//!
//! Trace writers emit counters as numbers, numeric strings, floats or null.
//! Everything is resolved to a well-defined value here; a field that cannot be
//! read is treated as unknown and replaced by the default, never reported.

use serde_json::Value;

/// Convert a loosely-typed numeric field to an unsigned integer
///
/// **Public** - used by the record assembler for time and I/O counters
///
/// # Arguments
/// * `value` - Raw field value (`None` when the key is missing)
/// * `default` - Returned for missing, null or unreadable values
///
/// # Returns
/// The value truncated toward zero. Negative, NaN and infinite values fall
/// back to `default`.
pub fn coerce_u64(value: Option<&Value>, default: u64) -> u64 {
    match value {
        None | Some(Value::Null) => default,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(v) => v,
            None => n.as_f64().and_then(truncate_f64).unwrap_or(default),
        },
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(truncate_f64)
            .unwrap_or(default),
        Some(_) => default,
    }
}

/// Truncate a float to u64, rejecting values with no sensible counter meaning
///
/// **Private** - internal helper for coerce_u64
fn truncate_f64(v: f64) -> Option<u64> {
    if v.is_finite() && v >= 0.0 {
        Some(v.trunc() as u64)
    } else {
        None
    }
}

/// Read a text field, rendering non-string scalars as their JSON text
///
/// **Public** - used for passthrough fields (timestamp, event, user, ...)
///
/// Null, missing, arrays and objects yield `None`.
pub fn text_field(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(v) if v.is_number() || v.is_boolean() => Some(v.to_string()),
        _ => None,
    }
}
