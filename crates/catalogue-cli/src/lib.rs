//! Catalogue CLI library.
//!
//! Command-line front end for the extraction pipeline: one-shot extraction
//! with exit codes per rejection kind, record lookups and the HTTP service.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;

use catalogue_server::config::ServerConfig;
use catalogue_store::SqliteStore;

/// Load the configuration named on the command line, or the defaults
///
/// A `--database` option replaces the configured database path.
pub fn load_config(config_path: Option<&str>, database: Option<&str>) -> Result<ServerConfig> {
    let mut config = match config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    if let Some(database) = database {
        config.database_path = database.to_string();
    }
    config.validate()?;
    Ok(config)
}

/// Execute a parsed command line, returning the process exit code
pub async fn execute(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref(), cli.database.as_deref())?;
    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Extract(args) => {
            let state = catalogue_server::build_state(&config)?;
            commands::execute_extract(args, &*state.extractor, &formatter).await
        }
        Command::Show(args) => {
            let store = SqliteStore::new(&config.database_path)?;
            commands::execute_show(args, &store, &formatter)
        }
        Command::Serve(args) => commands::execute_serve(args, config).await,
    }
}

/// Install a tracing subscriber writing to stderr
///
/// Honours `RUST_LOG`, defaulting to `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
