//! Lenient numeric field parsing
//!
//! A field that fails to parse never aborts a batch. Blank text counts as
//! zero, while absent fields and unparseable text become NaN so that they
//! surface as gaps downstream.

use serde_json::Value;

/// Parse an optional text field
#[must_use]
pub fn parse_numeric(field: Option<&str>) -> f64 {
    match field.map(str::trim) {
        None => f64::NAN,
        Some("") => 0.0,
        Some(text) => text.parse().unwrap_or(f64::NAN),
    }
}

/// Parse an optional JSON field holding a number or numeric string
#[must_use]
pub fn parse_json_numeric(field: Option<&Value>) -> f64 {
    match field {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_numeric(Some(s)),
        _ => f64::NAN,
    }
}
