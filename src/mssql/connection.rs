// ABOUTME: SQL Server connection handling over tiberius
// ABOUTME: Builds driver config from the loaded Config and maps connect failures to readable errors

use super::convert::row_to_values;
use super::handle::{Connect, SqlHandle};
use crate::config::Config;
use crate::migration::Row;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tiberius::{AuthMethod, Client, EncryptionLevel};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// Opens connections to the server described by a [`Config`]
#[derive(Debug, Clone)]
pub struct Connector {
    config: Config,
}

impl Connector {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn driver_config(&self, database: Option<&str>) -> tiberius::Config {
        let mut config = tiberius::Config::new();
        config.host(self.config.host());
        config.port(self.config.port());
        config.authentication(AuthMethod::sql_server(
            &self.config.username,
            &self.config.password,
        ));

        if let Some(db) = database {
            config.database(db);
        }

        if self.config.trust_server_certificate {
            config.trust_cert();
        }

        config.encryption(if self.config.encrypt {
            EncryptionLevel::Required
        } else {
            EncryptionLevel::Off
        });

        config
    }
}

#[async_trait]
impl Connect for Connector {
    type Handle = MssqlHandle;

    async fn connect(&self, database: Option<&str>) -> Result<MssqlHandle> {
        let config = self.driver_config(database);
        let addr = config.get_addr();

        tracing::debug!(
            "Connecting to {} (database: {})",
            addr,
            database.unwrap_or("<server>")
        );

        let tcp = TcpStream::connect(&addr)
            .await
            .map_err(|e| describe_connect_error(&addr, &e.to_string()))?;
        tcp.set_nodelay(true)
            .context("Failed to configure TCP socket")?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| describe_connect_error(&addr, &e.to_string()))?;

        Ok(MssqlHandle { client })
    }
}

/// Turn a driver or socket failure into an actionable message
fn describe_connect_error(addr: &str, error_msg: &str) -> anyhow::Error {
    if error_msg.contains("Login failed") {
        anyhow::anyhow!(
            "Authentication failed: Invalid username or password.\n\
             Please verify the credentials in your config file.\n\
             Error: {}",
            error_msg
        )
    } else if error_msg.contains("Cannot open database") {
        anyhow::anyhow!(
            "Database is not accessible: {}\n\
             Check the --db name or your permissions on it.",
            error_msg
        )
    } else if error_msg.contains("refused") {
        anyhow::anyhow!(
            "Connection refused: Unable to reach SQL Server at {}.\n\
             Please check:\n\
             - The server name and port are correct\n\
             - SQL Server is running and accepts TCP connections\n\
             - Firewall rules allow connections\n\
             Error: {}",
            addr,
            error_msg
        )
    } else if error_msg.contains("timed out") || error_msg.contains("timeout") {
        anyhow::anyhow!(
            "Connection timeout: SQL Server at {} did not respond in time.\n\
             Error: {}",
            addr,
            error_msg
        )
    } else if error_msg.contains("TLS") || error_msg.contains("certificate") {
        anyhow::anyhow!(
            "TLS error: Failed to establish a secure connection.\n\
             Set \"trust_server_certificate\" or \"encrypt\" in your config accordingly.\n\
             Error: {}",
            error_msg
        )
    } else {
        anyhow::anyhow!("Failed to connect to SQL Server at {}: {}", addr, error_msg)
    }
}

/// A tiberius client bound to one server and optionally one database
pub struct MssqlHandle {
    client: Client<Compat<TcpStream>>,
}

#[async_trait]
impl SqlHandle for MssqlHandle {
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        let rows = self
            .client
            .simple_query(sql)
            .await?
            .into_first_result()
            .await?;

        rows.into_iter().map(row_to_values).collect()
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.client.simple_query(sql).await?.into_results().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            server: "db.local,1500".into(),
            username: "sa".into(),
            password: "secret".into(),
            ..Config::default()
        }
    }

    #[test]
    fn test_driver_config_uses_host_and_port() {
        let connector = Connector::new(sample_config());
        let config = connector.driver_config(Some("Sales"));
        assert_eq!(config.get_addr(), "db.local:1500");
    }

    #[test]
    fn test_connect_error_messages() {
        let err = describe_connect_error("h:1433", "Login failed for user 'sa'.");
        assert!(err.to_string().contains("Authentication failed"));

        let err = describe_connect_error("h:1433", "Connection refused (os error 111)");
        assert!(err.to_string().contains("Connection refused"));
        assert!(err.to_string().contains("h:1433"));

        let err = describe_connect_error("h:1433", "something odd");
        assert!(err.to_string().starts_with("Failed to connect to SQL Server"));
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let config = Config {
            server: "127.0.0.1,1".into(),
            ..sample_config()
        };
        let result = Connector::new(config).connect(None).await;
        assert!(result.is_err());
    }

    // NOTE: Requires a reachable SQL Server; see tests/integration_test.rs
    #[tokio::test]
    #[ignore]
    async fn test_connect_with_valid_config_succeeds() {
        let config = Config {
            server: std::env::var("TEST_MSSQL_SERVER").unwrap(),
            username: std::env::var("TEST_MSSQL_USERNAME").unwrap(),
            password: std::env::var("TEST_MSSQL_PASSWORD").unwrap(),
            ..Config::default()
        };
        let mut handle = Connector::new(config).connect(None).await.unwrap();
        let rows = handle.query("SELECT 1").await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
