// ABOUTME: Database handle abstractions used by the dump/restore engine
// ABOUTME: Decouples introspection, export and import from the concrete driver

use crate::migration::Row;
use anyhow::Result;
use async_trait::async_trait;

/// A live connection, optionally scoped to one database
///
/// Statements are sent as plain SQL batches. Dropping the handle closes the
/// connection.
#[async_trait]
pub trait SqlHandle: Send {
    /// Run a statement and return the rows of its first result set
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>>;

    /// Run a statement for its side effects, draining any results
    async fn execute(&mut self, sql: &str) -> Result<()>;
}

/// Opens handles against one configured server
#[async_trait]
pub trait Connect: Sync {
    type Handle: SqlHandle;

    /// Open a handle scoped to `database`, or a server-level handle for `None`
    async fn connect(&self, database: Option<&str>) -> Result<Self::Handle>;
}
