// ABOUTME: List commands - databases on the server and tables of one database
// ABOUTME: Read-only; prints one "- name" line per entry

use crate::migration;
use crate::mssql::Connect;
use anyhow::{Context, Result};

/// Print every database on the server
///
/// Uses a server-level connection, so it works before any `--db` is known.
pub async fn list_databases<C: Connect + ?Sized>(connector: &C) -> Result<Vec<String>> {
    let mut handle = connector
        .connect(None)
        .await
        .context("Failed to connect to server")?;

    let databases = migration::list_databases(&mut handle).await?;

    println!("Available databases:\n");
    for name in &databases {
        println!("- {}", name);
    }
    println!("\nPass a database name with --db to list its tables.");

    Ok(databases)
}

/// Print the base tables of `database`
pub async fn list_tables<C: Connect + ?Sized>(connector: &C, database: &str) -> Result<Vec<String>> {
    let mut handle = connector
        .connect(Some(database))
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database))?;

    let tables: Vec<String> = migration::list_tables(&mut handle)
        .await?
        .into_iter()
        .map(|table| table.name)
        .collect();

    println!("Tables:");
    for name in &tables {
        println!("- {}", name);
    }

    Ok(tables)
}
