//! Tabular row codec.
//!
//! Tables are CSV with a header row. Nulls are empty strings, dates and
//! timestamps are ISO-8601 text, booleans are `true`/`false`. Decoding keys
//! every row by column name so absent optional columns read as null.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use grove_core::time;

use crate::error::BackupError;

/// Encode a table: `columns` as header, then one record per row.
///
/// # Errors
///
/// Returns `BackupError::Csv` if a row cannot be written.
pub fn encode_table<I>(table: &str, columns: &[&str], rows: I) -> Result<Vec<u8>, BackupError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let csv_err = |source| BackupError::Csv {
        table: table.to_string(),
        source,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns).map_err(csv_err)?;
    for row in rows {
        writer.write_record(&row).map_err(csv_err)?;
    }
    writer.into_inner().map_err(|e| BackupError::Csv {
        table: table.to_string(),
        source: e.into_error().into(),
    })
}

/// Decode a table from bytes. `table` names the rows in field errors.
///
/// # Errors
///
/// Returns `BackupError::Csv` on malformed CSV.
pub fn decode_table(table: &str, bytes: &[u8]) -> Result<Vec<RawRow>, BackupError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let csv_err = |source| BackupError::Csv {
        table: table.to_string(),
        source,
    };
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let values = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.trim_start_matches('\u{feff}').trim().to_string(), v.to_string()))
            .collect();
        rows.push(RawRow {
            table: table.to_string(),
            values,
        });
    }
    Ok(rows)
}

/// Decode a table file; a missing file is an empty table.
///
/// # Errors
///
/// Returns `BackupError::Io` if the file exists but cannot be read, or
/// `BackupError::Csv` on malformed CSV.
pub fn load_table(table: &str, path: &Path) -> Result<Vec<RawRow>, BackupError> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let bytes = std::fs::read(path).map_err(|e| BackupError::io(path, e))?;
    decode_table(table, &bytes)
}

pub fn opt_text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

pub fn opt_id(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn opt_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn boolean(value: bool) -> String {
    let text = if value { "true" } else { "false" };
    text.to_string()
}

pub fn timestamp(value: &DateTime<Utc>) -> String {
    time::format_timestamp(value)
}

pub fn opt_timestamp(value: Option<&DateTime<Utc>>) -> String {
    value.map(time::format_timestamp).unwrap_or_default()
}

pub fn opt_date(value: Option<&NaiveDate>) -> String {
    value.map(time::format_date).unwrap_or_default()
}

/// One decoded row, keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    table: String,
    values: HashMap<String, String>,
}

impl RawRow {
    /// Build a row directly, mainly for hierarchical index rows and tests.
    #[must_use]
    pub fn new<'a>(table: &str, values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            table: table.to_string(),
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    fn field(&self, column: &str) -> String {
        format!("{}.{column}", self.table)
    }

    /// Raw value, `None` when the column is absent or empty.
    ///
    /// Whitespace is kept as written; only typed accessors trim.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Set `column` to `value` when it is absent or blank.
    pub fn fill_missing(&mut self, column: &str, value: &str) {
        if self.get(column).is_none_or(|v| v.trim().is_empty()) {
            self.values.insert(column.to_string(), value.to_string());
        }
    }

    /// Value as-is, empty string when absent.
    #[must_use]
    pub fn string(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    #[must_use]
    pub fn opt_string(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    /// Required integer identifier.
    ///
    /// # Errors
    ///
    /// `MissingField` when absent or empty, `InvalidField` when not an integer.
    pub fn require_id(&self, column: &str) -> Result<i64, BackupError> {
        self.opt_id(column)?.ok_or_else(|| BackupError::MissingField {
            field: self.field(column),
        })
    }

    /// # Errors
    ///
    /// `InvalidField` when present but not an integer.
    pub fn opt_id(&self, column: &str) -> Result<Option<i64>, BackupError> {
        self.parse_with(column, |v| v.parse::<i64>().map_err(|e| e.to_string()))
    }

    /// # Errors
    ///
    /// `InvalidField` when present but not a number.
    pub fn opt_number(&self, column: &str) -> Result<Option<f64>, BackupError> {
        self.parse_with(column, |v| v.parse::<f64>().map_err(|e| e.to_string()))
    }

    /// Lenient boolean: `1/true/yes/y/on` are true, any other value false.
    #[must_use]
    pub fn flag(&self, column: &str) -> bool {
        self.get(column).is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "y" | "on"
            )
        })
    }

    /// # Errors
    ///
    /// `InvalidField` when present but not a date.
    pub fn opt_date(&self, column: &str) -> Result<Option<NaiveDate>, BackupError> {
        self.parse_with(column, |v| time::parse_date(v).map_err(|e| e.to_string()))
    }

    /// # Errors
    ///
    /// `InvalidField` when present but not a timestamp.
    pub fn opt_timestamp(&self, column: &str) -> Result<Option<DateTime<Utc>>, BackupError> {
        self.parse_with(column, |v| {
            time::parse_timestamp(v).map_err(|e| e.to_string())
        })
    }

    /// Timestamp, or `fallback` when absent.
    ///
    /// # Errors
    ///
    /// `InvalidField` when present but not a timestamp.
    pub fn timestamp_or(
        &self,
        column: &str,
        fallback: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, BackupError> {
        Ok(self.opt_timestamp(column)?.unwrap_or(fallback))
    }

    fn parse_with<T>(
        &self,
        column: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<Option<T>, BackupError> {
        let Some(value) = self.get(column).map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };
        parse(value)
            .map(Some)
            .map_err(|reason| BackupError::InvalidField {
                field: self.field(column),
                value: value.to_string(),
                reason,
            })
    }
}
