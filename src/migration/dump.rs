// ABOUTME: Assembles a portable T-SQL script from live schema and data
// ABOUTME: Emits USE directive, CREATE TABLE batches and INSERT batches separated by GO

use super::batch::SEPARATOR;
use super::schema::{list_columns, list_tables, ColumnInfo};
use super::value::encode_literal;
use crate::mssql::SqlHandle;
use crate::utils::{quote_identifier, sanitize_identifier};
use anyhow::{Context, Result};
use std::path::Path;

/// Counts describing an assembled script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub tables: usize,
    pub rows: usize,
}

/// Build the full script for the handle's current database
///
/// The script starts with `USE [database]`, then per table a
/// `-- TABLE: name` marker, a `CREATE TABLE` batch and, when the table has
/// rows, one `INSERT` per row followed by a separator. The column list that
/// shapes `CREATE TABLE` is also the select list for the data query, so
/// values always line up with the declared columns.
pub async fn assemble_script<H: SqlHandle + ?Sized>(
    handle: &mut H,
    database: &str,
) -> Result<(String, DumpSummary)> {
    let mut script = String::new();
    let mut summary = DumpSummary::default();

    script.push_str(&format!(
        "USE {}\n{}\n\n",
        quote_identifier(database),
        SEPARATOR
    ));

    let tables = list_tables(handle).await?;
    tracing::info!(
        "Found {} tables in '{}'",
        tables.len(),
        sanitize_identifier(database)
    );

    for table in &tables {
        let columns = list_columns(handle, &table.name).await?;

        script.push_str(&format!("-- TABLE: {}\n", table.name));
        script.push_str(&create_table_statement(&table.name, &columns));

        let rows = handle
            .query(&select_statement(&table.name, &columns))
            .await
            .with_context(|| format!("Failed to read rows of {}", table.name))?;

        tracing::debug!(
            "Dumping {} rows from {}",
            rows.len(),
            sanitize_identifier(&table.name)
        );

        if !rows.is_empty() {
            let target = quote_identifier(&table.name);
            for row in &rows {
                let values: Vec<String> = row.iter().map(encode_literal).collect();
                script.push_str(&format!(
                    "INSERT INTO {} VALUES ({});\n",
                    target,
                    values.join(", ")
                ));
            }
            script.push_str(&format!("{}\n\n", SEPARATOR));
        }

        summary.tables += 1;
        summary.rows += rows.len();
    }

    Ok((script, summary))
}

/// Assemble the script for `database` and write it to `output_path`
pub async fn dump_database<H: SqlHandle + ?Sized>(
    handle: &mut H,
    database: &str,
    output_path: &Path,
) -> Result<DumpSummary> {
    tracing::info!(
        "Exporting database '{}' to {}",
        sanitize_identifier(database),
        output_path.display()
    );

    let (script, summary) = assemble_script(handle, database).await?;

    std::fs::write(output_path, script)
        .with_context(|| format!("Failed to write script to {}", output_path.display()))?;

    tracing::info!(
        "✓ Export complete: {} tables, {} rows saved to {}",
        summary.tables,
        summary.rows,
        output_path.display()
    );
    Ok(summary)
}

fn create_table_statement(table: &str, columns: &[ColumnInfo]) -> String {
    let definitions: Vec<String> = columns
        .iter()
        .map(|column| format!("    {}", column.definition()))
        .collect();

    format!(
        "CREATE TABLE {} (\n{}\n);\n{}\n\n",
        quote_identifier(table),
        definitions.join(",\n"),
        SEPARATOR
    )
}

fn select_statement(table: &str, columns: &[ColumnInfo]) -> String {
    let names: Vec<String> = columns
        .iter()
        .map(|column| quote_identifier(&column.name))
        .collect();

    format!("SELECT {} FROM {}", names.join(", "), quote_identifier(table))
}
