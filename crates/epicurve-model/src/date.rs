//! Date join keys
//!
//! Sources are joined by the original `YYYY-MM-DD` string rather than by a
//! parsed date, which keeps the join free of timezone and precision effects.

use crate::error::ModelError;
use crate::CalendarDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of every date key
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Original string date of a record, used as the join key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    /// Wrap a raw date string without validating it
    #[inline]
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Key for a calendar date
    #[must_use]
    pub fn from_date(date: CalendarDate) -> Self {
        Self(date.format(DATE_KEY_FORMAT).to_string())
    }

    /// Raw key string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the key as a calendar date
    ///
    /// # Errors
    /// `ModelError::InvalidDate` if the key is not `YYYY-MM-DD`.
    pub fn to_date(&self) -> Result<CalendarDate, ModelError> {
        parse_date(&self.0)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a `YYYY-MM-DD` string
///
/// # Errors
/// `ModelError::InvalidDate` on any other shape.
pub fn parse_date(raw: &str) -> Result<CalendarDate, ModelError> {
    CalendarDate::parse_from_str(raw.trim(), DATE_KEY_FORMAT)
        .map_err(|_| ModelError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_parses_to_date() {
        let key = DateKey::new("2021-03-14");
        let date = key.to_date().unwrap();
        assert_eq!(date, CalendarDate::from_ymd_opt(2021, 3, 14).unwrap());
    }

    #[test]
    fn key_from_date_roundtrips_format() {
        let date = CalendarDate::from_ymd_opt(2020, 1, 5).unwrap();
        assert_eq!(DateKey::from_date(date).as_str(), "2020-01-05");
    }

    #[test]
    fn invalid_key_is_rejected() {
        assert!(DateKey::new("03/14/2021").to_date().is_err());
        assert!(DateKey::new("").to_date().is_err());
        assert!(parse_date("2021-02-30").is_err());
    }

    #[test]
    fn keys_compare_by_string() {
        assert_eq!(DateKey::new("2021-01-01"), DateKey::new("2021-01-01"));
        assert_ne!(DateKey::new("2021-01-01"), DateKey::new("2021-01-02"));
    }
}
