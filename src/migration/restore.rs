// ABOUTME: Replays a T-SQL script batch by batch into a target database
// ABOUTME: Retargets the USE directive, creates the database and halts on the first failing batch

use super::batch::{BatchSplitter, SeparatorSplitter};
use super::value::{encode_literal, Value};
use crate::error::ScriptError;
use crate::mssql::{Connect, SqlHandle};
use crate::utils::{preview, quote_identifier, sanitize_identifier};
use anyhow::{Context, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Characters of a failing batch kept in the report
pub const PREVIEW_CHARS: usize = 200;

fn directive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*USE\s*\[(?:[^\]]|\]\])*\]").expect("directive pattern is valid")
    })
}

/// A batch the server rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Zero-based position of the batch in the script
    pub index: usize,
    /// Leading characters of the batch text
    pub preview: String,
    /// Error reported by the server or driver
    pub message: String,
}

/// Outcome of replaying a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Batches that ran successfully before completion or halt
    pub executed: usize,
    /// Batches found in the script
    pub total: usize,
    pub failure: Option<BatchFailure>,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Point the script's single `USE [...]` directive at `database`
///
/// # Errors
///
/// The script must contain exactly one line-leading directive; zero or
/// several yield a [`ScriptError`].
pub fn retarget_script(script: &str, database: &str) -> Result<String, ScriptError> {
    let pattern = directive_pattern();
    match pattern.find_iter(script).count() {
        0 => return Err(ScriptError::MissingDirective),
        1 => {}
        count => return Err(ScriptError::MultipleDirectives { count }),
    }

    let directive = format!("USE {}", quote_identifier(database));
    Ok(pattern
        .replacen(script, 1, regex::NoExpand(&directive))
        .into_owned())
}

/// Create `database` unless it already exists
///
/// Must run on a handle that is not scoped to `database`.
pub async fn ensure_database<H: SqlHandle + ?Sized>(handle: &mut H, database: &str) -> Result<()> {
    let sql = format!(
        "IF DB_ID(N{}) IS NULL CREATE DATABASE {}",
        encode_literal(&Value::Text(database.to_string())),
        quote_identifier(database)
    );

    handle
        .execute(&sql)
        .await
        .with_context(|| format!("Failed to create database '{}'", database))
}

/// Execute batches in order, stopping at the first failure
///
/// Batches that already ran are not rolled back.
pub async fn execute_batches<H: SqlHandle + ?Sized>(
    handle: &mut H,
    script: &str,
    splitter: &dyn BatchSplitter,
) -> ImportReport {
    let batches = splitter.split(script);
    let total = batches.len();
    let mut executed = 0;

    for (index, batch) in batches.into_iter().enumerate() {
        tracing::debug!("Executing batch {}/{}", index + 1, total);

        if let Err(e) = handle.execute(batch).await {
            return ImportReport {
                executed,
                total,
                failure: Some(BatchFailure {
                    index,
                    preview: preview(batch, PREVIEW_CHARS).to_string(),
                    message: format!("{:#}", e),
                }),
            };
        }

        executed += 1;
    }

    ImportReport {
        executed,
        total,
        failure: None,
    }
}

/// Import `script` into `database`, creating it when missing
///
/// Opens a server-level handle to ensure the database exists, closes it,
/// then replays the retargeted script on a handle scoped to `database`.
/// A failing batch ends the import but still returns `Ok` with the report.
pub async fn import_script<C: Connect + ?Sized>(
    connector: &C,
    database: &str,
    script: &str,
) -> Result<ImportReport> {
    import_script_with(connector, database, script, &SeparatorSplitter::default()).await
}

/// [`import_script`] with a caller-supplied splitter
pub async fn import_script_with<C: Connect + ?Sized>(
    connector: &C,
    database: &str,
    script: &str,
    splitter: &dyn BatchSplitter,
) -> Result<ImportReport> {
    let script = retarget_script(script, database)?;
    let display_name = sanitize_identifier(database);

    {
        tracing::info!("Ensuring database '{}' exists...", display_name);
        let mut admin = connector
            .connect(None)
            .await
            .context("Failed to connect to server")?;
        ensure_database(&mut admin, database).await?;
    }

    tracing::info!("Connecting to database '{}'...", display_name);
    let mut handle = connector
        .connect(Some(database))
        .await
        .with_context(|| format!("Failed to connect to database '{}'", display_name))?;

    let report = execute_batches(&mut handle, &script, splitter).await;

    if report.is_complete() {
        tracing::info!("✓ Import complete: executed {} batches", report.executed);
    } else {
        tracing::warn!(
            "⚠ Import halted: executed {} of {} batches",
            report.executed,
            report.total
        );
    }

    Ok(report)
}
