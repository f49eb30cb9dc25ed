// ABOUTME: Server credentials loaded once at startup from a JSON file
// ABOUTME: Creates a template on first run and rejects incomplete files

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "mssql-script-migrator";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_PORT: u16 = 1433;

/// Connection settings for one SQL Server instance
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Overrides any `host,port` suffix in `server`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default = "default_true")]
    pub trust_server_certificate: bool,
    #[serde(default)]
    pub encrypt: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: String::new(),
            username: String::new(),
            password: String::new(),
            port: None,
            trust_server_certificate: true,
            encrypt: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .field("encrypt", &self.encrypt)
            .finish()
    }
}

impl Config {
    /// Default location: `<user config dir>/mssql-script-migrator/config.json`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load the config file, writing an empty template if it does not exist
    ///
    /// # Errors
    ///
    /// - `ConfigError::Created` when the template was just written
    /// - `ConfigError::Incomplete` when server, username or password is blank
    /// - I/O and JSON errors while reading or writing the file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            write_template(path)?;
            return Err(ConfigError::Created {
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(ConfigError::Incomplete {
                path: path.to_path_buf(),
                missing,
            });
        }

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("server", &self.server),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Host part of `server`, without any `,port` suffix
    pub fn host(&self) -> &str {
        match self.server.split_once(',') {
            Some((host, _)) => host.trim(),
            None => self.server.trim(),
        }
    }

    /// Explicit `port`, else the `host,port` suffix, else 1433
    pub fn port(&self) -> u16 {
        self.port
            .or_else(|| {
                self.server
                    .split_once(',')
                    .and_then(|(_, port)| port.trim().parse().ok())
            })
            .unwrap_or(DEFAULT_PORT)
    }
}

fn write_template(path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let template = serde_json::json!({
        "server": "",
        "username": "",
        "password": ""
    });
    let body = serde_json::to_string_pretty(&template).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, body).map_err(write_err)?;

    tracing::warn!("Created config template at {}", path.display());
    Ok(())
}
