// ABOUTME: Export command implementation - dump one database to a script file
// ABOUTME: Connects scoped to the database and writes schema plus data as T-SQL

use crate::migration::{self, DumpSummary};
use crate::mssql::Connect;
use crate::utils::sanitize_identifier;
use anyhow::{Context, Result};
use std::path::Path;

/// Export `database` into the script file at `output_path`
///
/// The file is written only after the whole script has been assembled; an
/// introspection or read failure leaves any existing file untouched.
pub async fn export<C: Connect + ?Sized>(
    connector: &C,
    database: &str,
    output_path: &Path,
) -> Result<DumpSummary> {
    let display_name = sanitize_identifier(database);
    tracing::info!("Connecting to database '{}'...", display_name);
    let mut handle = connector
        .connect(Some(database))
        .await
        .with_context(|| format!("Failed to connect to database '{}'", display_name))?;

    let summary = migration::dump_database(&mut handle, database, output_path).await?;

    println!("Export complete! File saved to: {}", output_path.display());
    Ok(summary)
}
