// ABOUTME: Typed row values and their T-SQL literal encoding
// ABOUTME: Every value read from SQL Server is rendered through encode_literal

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// A single row, positionally aligned with the column list it was queried with
pub type Row = Vec<Value>;

/// A value read from the server, tagged by its runtime type
///
/// The tag comes from the driver's native column data, never from the
/// declared column type. `Other` carries the unquoted textual form of
/// numbers, bits and binary data.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Text(String),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Other(String),
}

impl Value {
    /// Parses the payload of a `Text` or `Other` value as an integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Text(s) | Value::Other(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Encode a value as a T-SQL literal
///
/// - `Null` → `NULL`
/// - `Text` → single-quoted, embedded quotes doubled
/// - `DateTime` → `'YYYY-MM-DDTHH:MM:SS.fff'`
/// - `Date` → `'YYYY-MM-DD'`
/// - `Time` → `'HH:MM:SS.fff'`
/// - `Other` → emitted verbatim
///
/// Sub-millisecond digits are truncated, not rounded.
///
/// # Examples
///
/// ```
/// # use mssql_script_migrator::migration::{encode_literal, Value};
/// assert_eq!(encode_literal(&Value::Null), "NULL");
/// assert_eq!(encode_literal(&Value::Text("a'b".into())), "'a''b'");
/// assert_eq!(encode_literal(&Value::Other("42".into())), "42");
/// ```
pub fn encode_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        Value::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%dT%H:%M:%S%.3f")),
        Value::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        Value::Time(t) => format!("'{}'", t.format("%H:%M:%S%.3f")),
        Value::Other(s) => s.clone(),
    }
}
