// ABOUTME: Typed errors for configuration loading and script validation
// ABOUTME: Operational failures elsewhere are reported through anyhow with context

use std::path::PathBuf;
use thiserror::Error;

/// Configuration could not be used; the process must stop before touching a server
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Created config template at {}\n\
         Please fill in server, username and password, then run again.",
        .path.display()
    )]
    Created { path: PathBuf },

    #[error(
        "Config is incomplete, missing: {}\n\
         Fill in all fields in {}",
        .missing.join(", "),
        .path.display()
    )]
    Incomplete {
        path: PathBuf,
        missing: Vec<&'static str>,
    },

    #[error("Failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine the user configuration directory; pass --config")]
    NoConfigDir,
}

/// A script violates the single `USE [...]` directive precondition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Script has no USE [database] directive")]
    MissingDirective,

    #[error("Script has {count} USE [database] directives; exactly one is supported")]
    MultipleDirectives { count: usize },
}
