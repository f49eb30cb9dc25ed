// ABOUTME: CLI entry point for mssql-script-migrator
// ABOUTME: Loads config, parses flags and routes to list, export or import

use clap::Parser;
use mssql_script_migrator::commands::{self, Action};
use mssql_script_migrator::config::Config;
use mssql_script_migrator::mssql::Connector;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mssql-script-migrator")]
#[command(
    about = "Export SQL Server databases to T-SQL scripts and import them back",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Database name; pass an empty string to list the server's databases
    #[arg(long)]
    db: Option<String>,
    /// Import the given script into --db
    #[arg(short = 'i', long = "import", value_name = "PATH")]
    import_file: Option<PathBuf>,
    /// Export --db into the given script file
    #[arg(
        short = 'e',
        long = "export",
        visible_short_alias = 'o',
        visible_alias = "output",
        value_name = "PATH"
    )]
    export_file: Option<PathBuf>,
    /// Path to config.json (defaults to the user config directory)
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = match cli.config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;
    let connector = Connector::new(config);

    match Action::resolve(cli.db, cli.import_file, cli.export_file)? {
        Action::ListDatabases => {
            commands::list_databases(&connector).await?;
        }
        Action::ListTables { database } => {
            commands::list_tables(&connector, &database).await?;
        }
        Action::Import { database, path } => {
            commands::import(&connector, &database, &path).await?;
        }
        Action::Export { database, path } => {
            commands::export(&connector, &database, &path).await?;
        }
    }

    Ok(())
}
