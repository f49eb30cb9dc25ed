// ABOUTME: Library module for mssql-script-migrator
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod config;
pub mod error;
pub mod migration;
pub mod mssql;
pub mod utils;
