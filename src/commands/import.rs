// ABOUTME: Import command implementation - replay a script file into a database
// ABOUTME: Reports the executed batch count and the failing batch, if any

use crate::migration::{self, ImportReport};
use crate::mssql::Connect;
use anyhow::{Context, Result};
use std::path::Path;

/// Import the script at `input_path` into `database`
///
/// A batch failure is reported but is not an error: the import stops and
/// the batches already applied stay applied.
pub async fn import<C: Connect + ?Sized>(
    connector: &C,
    database: &str,
    input_path: &Path,
) -> Result<ImportReport> {
    tracing::info!("Reading script {}...", input_path.display());
    let script = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read script {}", input_path.display()))?;

    let report = migration::import_script(connector, database, &script).await?;

    if let Some(failure) = &report.failure {
        tracing::error!(
            "Error executing batch {} of {}:\n{} ...\n\n{}",
            failure.index + 1,
            report.total,
            failure.preview,
            failure.message
        );
    }

    println!(
        "Import complete! Executed {} of {} SQL batches.",
        report.executed, report.total
    );
    Ok(report)
}
