// ABOUTME: Conversion of tiberius column data into tagged row values
// ABOUTME: The match is exhaustive over the driver's variants so new types fail to compile

use crate::migration::{Row, Value};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;
use tiberius::numeric::Numeric;
use tiberius::{ColumnData, FromSql};

/// Convert one driver row into values in column order
pub fn row_to_values(row: tiberius::Row) -> Result<Row> {
    row.into_iter().map(column_to_value).collect()
}

/// Convert one driver column into a [`Value`]
///
/// Character, XML, GUID and datetimeoffset data become `Text`; temporal
/// types become their chrono-backed variants; bits, numbers and binary data
/// become `Other` with their literal T-SQL rendering.
pub fn column_to_value(data: ColumnData<'static>) -> Result<Value> {
    let value = match data {
        ColumnData::U8(v) => v.map(|v| Value::Other(v.to_string())),
        ColumnData::I16(v) => v.map(|v| Value::Other(v.to_string())),
        ColumnData::I32(v) => v.map(|v| Value::Other(v.to_string())),
        ColumnData::I64(v) => v.map(|v| Value::Other(v.to_string())),
        // Debug output switches to exponent form at extreme magnitudes
        ColumnData::F32(v) => v.map(|v| Value::Other(format!("{v:?}"))),
        ColumnData::F64(v) => v.map(|v| Value::Other(format!("{v:?}"))),
        ColumnData::Bit(v) => v.map(|b| Value::Other(if b { "1" } else { "0" }.to_string())),
        ColumnData::Numeric(v) => v.map(|n| Value::Other(numeric_literal(n))),
        ColumnData::Binary(v) => v.map(|bytes| Value::Other(hex_literal(&bytes))),
        ColumnData::String(v) => v.map(|s| Value::Text(s.into_owned())),
        ColumnData::Guid(v) => v.map(|g| Value::Text(g.to_string())),
        ColumnData::Xml(v) => v.map(|x| Value::Text(x.into_owned().into_string())),
        ref temporal @ (ColumnData::DateTime(_)
        | ColumnData::SmallDateTime(_)
        | ColumnData::DateTime2(_)) => NaiveDateTime::from_sql(temporal)
            .context("Failed to decode datetime column")?
            .map(Value::DateTime),
        ref date @ ColumnData::Date(_) => NaiveDate::from_sql(date)
            .context("Failed to decode date column")?
            .map(Value::Date),
        ref time @ ColumnData::Time(_) => NaiveTime::from_sql(time)
            .context("Failed to decode time column")?
            .map(Value::Time),
        ref offset @ ColumnData::DateTimeOffset(_) => DateTime::<FixedOffset>::from_sql(offset)
            .context("Failed to decode datetimeoffset column")?
            .map(|dt| Value::Text(dt.format("%Y-%m-%d %H:%M:%S%.3f %:z").to_string())),
    };

    Ok(value.unwrap_or(Value::Null))
}

/// Render a decimal as a T-SQL numeric literal
///
/// The driver's own `Display` repeats the sign on the fractional part, so
/// the digits are laid out from the unscaled value instead.
pub fn numeric_literal(n: Numeric) -> String {
    let value = n.value();
    let scale = u32::from(n.scale());
    let sign = if value < 0 { "-" } else { "" };
    let digits = value.unsigned_abs();

    if scale == 0 {
        return format!("{sign}{digits}");
    }

    let divisor = 10u128.pow(scale);
    format!(
        "{sign}{}.{:0width$}",
        digits / divisor,
        digits % divisor,
        width = scale as usize
    )
}

/// Render bytes as a T-SQL binary literal (`0x` followed by uppercase hex)
pub fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for byte in bytes {
        let _ = write!(out, "{byte:02X}");
    }
    out
}
