// ABOUTME: SQL Server access layer
// ABOUTME: Exports the handle traits, the tiberius-backed connector and value conversion

pub mod connection;
pub mod convert;
pub mod handle;

#[cfg(test)]
pub(crate) mod mock;

pub use connection::{Connector, MssqlHandle};
pub use handle::{Connect, SqlHandle};
