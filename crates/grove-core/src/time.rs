//! ISO-8601 text helpers.
//!
//! Timestamps are written as RFC 3339 in UTC. Reading also accepts the naive
//! forms older exports used (`2024-03-01T10:00:00.123456`,
//! `2024-03-01 10:00:00`), which are taken to be UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, ParseError, SecondsFormat, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Format a timestamp as RFC 3339 with a `Z` suffix.
#[must_use]
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Format a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(value: &NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Parse a timestamp in RFC 3339 or one of the naive ISO-8601 forms.
///
/// # Errors
///
/// Returns the naive-format parse error when no form matches.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, NAIVE_FORMATS[0])
        .or_else(|_| NaiveDateTime::parse_from_str(s, NAIVE_FORMATS[1]))
        .map(|naive| naive.and_utc())
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns the chrono parse error for malformed input.
pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
}
