// ABOUTME: Schema introspection through INFORMATION_SCHEMA and sys.databases
// ABOUTME: Discovers databases, base tables and per-table column definitions

use super::value::{encode_literal, Row, Value};
use crate::mssql::SqlHandle;
use crate::utils::quote_identifier;
use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    /// `CHARACTER_MAXIMUM_LENGTH`; -1 marks the `(max)` types
    pub max_length: Option<i64>,
    /// `NUMERIC_PRECISION`/`NUMERIC_SCALE`, only kept for decimal and numeric
    pub precision: Option<(i64, i64)>,
}

impl ColumnInfo {
    /// Type as it appears in a column definition, e.g. `nvarchar(50)`
    pub fn type_definition(&self) -> String {
        match (self.max_length, self.precision) {
            (Some(-1), _) => format!("{}(max)", self.data_type),
            (Some(len), _) if len > 0 => format!("{}({})", self.data_type, len),
            (_, Some((precision, scale))) => {
                format!("{}({}, {})", self.data_type, precision, scale)
            }
            _ => self.data_type.clone(),
        }
    }

    /// `[name] type` line for CREATE TABLE
    pub fn definition(&self) -> String {
        format!("{} {}", quote_identifier(&self.name), self.type_definition())
    }
}

/// List every database on the server, in catalog order
pub async fn list_databases<H: SqlHandle + ?Sized>(handle: &mut H) -> Result<Vec<String>> {
    let rows = handle
        .query("SELECT name FROM sys.databases")
        .await
        .context("Failed to list databases")?;

    rows.iter()
        .map(|row| text_at(row, 0, "name"))
        .collect()
}

/// List base tables of the handle's current database
///
/// Views and synonyms are excluded. No ordering is imposed beyond what the
/// server returns.
pub async fn list_tables<H: SqlHandle + ?Sized>(handle: &mut H) -> Result<Vec<TableInfo>> {
    let rows = handle
        .query(
            "SELECT TABLE_NAME
             FROM INFORMATION_SCHEMA.TABLES
             WHERE TABLE_TYPE = 'BASE TABLE'",
        )
        .await
        .context("Failed to list tables")?;

    rows.iter()
        .map(|row| text_at(row, 0, "TABLE_NAME").map(|name| TableInfo { name }))
        .collect()
}

/// List the columns of `table` in the order INFORMATION_SCHEMA returns them
///
/// # Errors
///
/// Fails if the query fails or if the table has no visible columns.
pub async fn list_columns<H: SqlHandle + ?Sized>(
    handle: &mut H,
    table: &str,
) -> Result<Vec<ColumnInfo>> {
    let sql = format!(
        "SELECT COLUMN_NAME, DATA_TYPE, CHARACTER_MAXIMUM_LENGTH,
                NUMERIC_PRECISION, NUMERIC_SCALE
         FROM INFORMATION_SCHEMA.COLUMNS
         WHERE TABLE_NAME = {}",
        encode_literal(&Value::Text(table.to_string()))
    );

    let rows = handle
        .query(&sql)
        .await
        .with_context(|| format!("Failed to get columns for {}", table))?;

    if rows.is_empty() {
        bail!("Table {} has no columns", table);
    }

    rows.iter()
        .map(|row| {
            let data_type = text_at(row, 1, "DATA_TYPE")?;
            let precision = if has_precision(&data_type) {
                row.get(3)
                    .and_then(Value::as_i64)
                    .zip(row.get(4).and_then(Value::as_i64))
            } else {
                None
            };

            Ok(ColumnInfo {
                name: text_at(row, 0, "COLUMN_NAME")?,
                data_type,
                max_length: row.get(2).and_then(Value::as_i64),
                precision,
            })
        })
        .collect()
}

fn has_precision(data_type: &str) -> bool {
    data_type.eq_ignore_ascii_case("decimal") || data_type.eq_ignore_ascii_case("numeric")
}

fn text_at(row: &Row, index: usize, column: &str) -> Result<String> {
    match row.get(index) {
        Some(Value::Text(s)) => Ok(s.clone()),
        other => bail!("Expected text in column {}, got {:?}", column, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mssql::mock::MockHandle;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[tokio::test]
    async fn test_list_databases() {
        let mut handle = MockHandle::new().with_rows(
            "sys.databases",
            vec![vec![text("master")], vec![text("Sales")]],
        );

        let databases = list_databases(&mut handle).await.unwrap();
        assert_eq!(databases, vec!["master", "Sales"]);
    }

    #[tokio::test]
    async fn test_list_tables_filters_base_tables() {
        let mut handle = MockHandle::new().with_rows(
            "INFORMATION_SCHEMA.TABLES",
            vec![vec![text("Orders")], vec![text("Customers")]],
        );

        let tables = list_tables(&mut handle).await.unwrap();
        assert_eq!(
            tables,
            vec![
                TableInfo {
                    name: "Orders".into()
                },
                TableInfo {
                    name: "Customers".into()
                }
            ]
        );
        assert!(handle.queries()[0].contains("TABLE_TYPE = 'BASE TABLE'"));
    }

    #[tokio::test]
    async fn test_list_columns_keeps_server_order() {
        let mut handle = MockHandle::new().with_rows(
            "INFORMATION_SCHEMA.COLUMNS",
            vec![
                vec![text("Name"), text("nvarchar"), Value::Other("50".into())],
                vec![text("Id"), text("int"), Value::Null],
                vec![text("Notes"), text("nvarchar"), Value::Other("-1".into())],
                vec![
                    text("Price"),
                    text("decimal"),
                    Value::Null,
                    Value::Other("10".into()),
                    Value::Other("2".into()),
                ],
                vec![
                    text("Qty"),
                    text("int"),
                    Value::Null,
                    Value::Other("10".into()),
                    Value::Other("0".into()),
                ],
            ],
        );

        let columns = list_columns(&mut handle, "Orders").await.unwrap();
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Name", "Id", "Notes", "Price", "Qty"]);
        assert_eq!(columns[0].max_length, Some(50));
        assert_eq!(columns[1].max_length, None);
        assert_eq!(columns[3].type_definition(), "decimal(10, 2)");
        assert_eq!(columns[4].type_definition(), "int");
    }

    #[tokio::test]
    async fn test_list_columns_escapes_table_name() {
        let mut handle = MockHandle::new().with_rows(
            "INFORMATION_SCHEMA.COLUMNS",
            vec![vec![text("Id"), text("int"), Value::Null]],
        );

        list_columns(&mut handle, "O'Brien").await.unwrap();
        assert!(handle.queries()[0].contains("TABLE_NAME = 'O''Brien'"));
    }

    #[tokio::test]
    async fn test_list_columns_rejects_table_without_columns() {
        let mut handle = MockHandle::new();
        let err = list_columns(&mut handle, "Ghost").await.unwrap_err();
        assert!(err.to_string().contains("has no columns"));
    }

    #[tokio::test]
    async fn test_query_error_is_surfaced() {
        let mut handle =
            MockHandle::new().with_query_error("INFORMATION_SCHEMA.TABLES", "permission denied");
        let err = list_tables(&mut handle).await.unwrap_err();
        assert!(format!("{:#}", err).contains("permission denied"));
    }

    #[test]
    fn test_type_definition() {
        let column = |data_type: &str, max_length| ColumnInfo {
            name: "c".into(),
            data_type: data_type.into(),
            max_length,
            precision: None,
        };

        assert_eq!(column("nvarchar", Some(50)).type_definition(), "nvarchar(50)");
        assert_eq!(column("int", None).type_definition(), "int");
        assert_eq!(column("char", Some(0)).type_definition(), "char");
        assert_eq!(column("varbinary", Some(-1)).type_definition(), "varbinary(max)");
        assert_eq!(column("varchar", Some(10)).definition(), "[c] varchar(10)");

        let numeric = ColumnInfo {
            precision: Some((18, 4)),
            ..column("numeric", None)
        };
        assert_eq!(numeric.type_definition(), "numeric(18, 4)");
    }
}
