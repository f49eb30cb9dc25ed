// ABOUTME: Command implementations and CLI dispatch
// ABOUTME: Exports list, export and import commands plus the Action resolver

pub mod export;
pub mod import;
pub mod list;

pub use export::export;
pub use import::import;
pub use list::{list_databases, list_tables};

use anyhow::{bail, Result};
use std::path::PathBuf;

/// What a single invocation will do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListDatabases,
    ListTables { database: String },
    Import { database: String, path: PathBuf },
    Export { database: String, path: PathBuf },
}

impl Action {
    /// Decide the action from the raw flags
    ///
    /// A missing `--db` is an error. A blank `--db` always lists databases,
    /// whatever else was passed. Import takes precedence over export, and
    /// with neither the tables of `--db` are listed.
    pub fn resolve(
        db: Option<String>,
        import: Option<PathBuf>,
        export: Option<PathBuf>,
    ) -> Result<Self> {
        let Some(database) = db else {
            bail!("Please set the database name with --db (use --db \"\" to list databases)");
        };

        if database.trim().is_empty() {
            return Ok(Action::ListDatabases);
        }

        Ok(match (import, export) {
            (Some(path), _) => Action::Import { database, path },
            (None, Some(path)) => Action::Export { database, path },
            (None, None) => Action::ListTables { database },
        })
    }
}
