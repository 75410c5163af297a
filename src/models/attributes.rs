//! Attribute snapshots
//!
//! Entities expose their state as a map of typed attribute values. Before a
//! snapshot is stored in a revision every value is flattened to a string, so
//! revisions only ever hold `attribute -> string` mappings.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{RevisionError, RevisionResult};

/// Default format used to stringify date attributes
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single attribute value of a tracked entity
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    DateTime(DateTime<Utc>),
    Text(String),
}

/// Attribute name -> typed value, as held by an entity
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Attribute name -> stringified value, as stored in a revision
pub type RevisionData = BTreeMap<String, String>;

impl AttributeValue {
    /// Flatten the value to the string stored in a revision
    ///
    /// Dates use `date_format`; null becomes the empty string and booleans
    /// become `"1"` / `"0"`.
    pub fn to_revision_string(&self, date_format: &str) -> String {
        match self {
            AttributeValue::Null => String::new(),
            AttributeValue::Bool(true) => "1".to_string(),
            AttributeValue::Bool(false) => "0".to_string(),
            AttributeValue::Int(i) => i.to_string(),
            AttributeValue::Float(f) => f.to_string(),
            AttributeValue::DateTime(dt) => dt.format(date_format).to_string(),
            AttributeValue::Text(s) => s.clone(),
        }
    }

    /// Whether the value counts as "nothing" when walking relations
    pub fn is_blank(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Interpret the value as a point in time
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            AttributeValue::DateTime(dt) => Some(*dt),
            AttributeValue::Text(s) => parse_timestamp(s).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_revision_string(DEFAULT_DATE_FORMAT))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(i64::from(value))
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<DateTime<Utc>> for AttributeValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttributeValue::DateTime(value)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttributeValue::Null)
    }
}

/// Entries of `new` that are missing from `old` or hold a different value
pub fn diff_assoc(new: &RevisionData, old: &RevisionData) -> RevisionData {
    new.iter()
        .filter(|(key, value)| old.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Parse a user-supplied timestamp
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (taken as UTC) and a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(input: &str) -> RevisionResult<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, DEFAULT_DATE_FORMAT) {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            RevisionError::invalid_argument(format!("unrecognised timestamp '{}'", input))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn data(pairs: &[(&str, &str)]) -> RevisionData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_stringify_scalars() {
        assert_eq!(AttributeValue::Null.to_revision_string(DEFAULT_DATE_FORMAT), "");
        assert_eq!(AttributeValue::Bool(true).to_revision_string(DEFAULT_DATE_FORMAT), "1");
        assert_eq!(AttributeValue::Bool(false).to_revision_string(DEFAULT_DATE_FORMAT), "0");
        assert_eq!(AttributeValue::Int(-7).to_revision_string(DEFAULT_DATE_FORMAT), "-7");
        assert_eq!(AttributeValue::Float(1.5).to_revision_string(DEFAULT_DATE_FORMAT), "1.5");
        assert_eq!(AttributeValue::from("abc").to_revision_string(DEFAULT_DATE_FORMAT), "abc");
    }

    #[test]
    fn test_stringify_dates_with_format() {
        let dt = Utc.with_ymd_and_hms(2015, 3, 5, 10, 30, 0).unwrap();
        let value = AttributeValue::from(dt);
        assert_eq!(value.to_revision_string(DEFAULT_DATE_FORMAT), "2015-03-05 10:30:00");
        assert_eq!(value.to_revision_string("%d/%m/%Y"), "05/03/2015");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(AttributeValue::from(None::<i64>), AttributeValue::Null);
        assert_eq!(AttributeValue::from(Some(3)), AttributeValue::Int(3));
    }

    #[test]
    fn test_diff_assoc_reports_changed_and_added_keys() {
        let old = data(&[("foo", "1"), ("bar", "2"), ("gone", "x")]);
        let new = data(&[("foo", "1"), ("bar", "3"), ("fresh", "y")]);

        let diff = diff_assoc(&new, &old);
        assert_eq!(diff, data(&[("bar", "3"), ("fresh", "y")]));
    }

    #[test]
    fn test_diff_assoc_identical_is_empty() {
        let old = data(&[("foo", "1")]);
        assert!(diff_assoc(&old.clone(), &old).is_empty());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_timestamp("2020-01-02T03:04:05Z").unwrap(), expected);
        assert_eq!(parse_timestamp("2020-01-02 03:04:05").unwrap(), expected);
        assert_eq!(
            parse_timestamp("2020-01-02").unwrap(),
            Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("yesterday").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_timestamp_looking_text_stays_text() {
        let value = AttributeValue::from("2024-01-01T00:00:00Z");
        assert_eq!(value, AttributeValue::Text("2024-01-01T00:00:00Z".into()));
        assert_eq!(value.to_revision_string("%d/%m/%Y"), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_blank_values() {
        assert!(AttributeValue::Null.is_blank());
        assert!(AttributeValue::from("").is_blank());
        assert!(!AttributeValue::Int(0).is_blank());
    }
}
