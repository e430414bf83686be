//! Row-to-entity parsing helpers.
//!
//! Timestamps and dates are stored as ISO-8601 TEXT; booleans as INTEGER
//! 0/1. These helpers isolate the conversions so every repo decodes the
//! same way.

use chrono::{DateTime, NaiveDate, Utc};
use grove_core::time;

use crate::error::DatabaseError;

/// Read a required TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidValue` if the text is not a timestamp.
pub fn get_datetime(
    row: &libsql::Row,
    idx: i32,
    table: &'static str,
    column: &'static str,
) -> Result<DateTime<Utc>, DatabaseError> {
    let text = row.get::<String>(idx)?;
    time::parse_timestamp(&text).map_err(|e| DatabaseError::InvalidValue {
        table,
        column,
        reason: format!("'{text}': {e}"),
    })
}

/// Read a nullable TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidValue` if a non-empty value is not a timestamp.
pub fn get_opt_datetime(
    row: &libsql::Row,
    idx: i32,
    table: &'static str,
    column: &'static str,
) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match get_opt_string(row, idx)? {
        Some(text) => time::parse_timestamp(&text)
            .map(Some)
            .map_err(|e| DatabaseError::InvalidValue {
                table,
                column,
                reason: format!("'{text}': {e}"),
            }),
        None => Ok(None),
    }
}

/// Read a nullable TEXT column as `Option<NaiveDate>`.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidValue` if a non-empty value is not a date.
pub fn get_opt_date(
    row: &libsql::Row,
    idx: i32,
    table: &'static str,
    column: &'static str,
) -> Result<Option<NaiveDate>, DatabaseError> {
    match get_opt_string(row, idx)? {
        Some(text) => time::parse_date(&text)
            .map(Some)
            .map_err(|e| DatabaseError::InvalidValue {
                table,
                column,
                reason: format!("'{text}': {e}"),
            }),
        None => Ok(None),
    }
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read an INTEGER 0/1 column as `bool`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_bool(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Timestamp parameter for an INSERT.
#[must_use]
pub fn ts(value: &DateTime<Utc>) -> String {
    time::format_timestamp(value)
}

/// Nullable timestamp parameter for an INSERT.
#[must_use]
pub fn opt_ts(value: Option<&DateTime<Utc>>) -> Option<String> {
    value.map(time::format_timestamp)
}

/// Nullable date parameter for an INSERT.
#[must_use]
pub fn opt_date(value: Option<&NaiveDate>) -> Option<String> {
    value.map(time::format_date)
}
