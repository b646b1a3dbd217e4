//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Catalogue CLI - Extract model records from text and inspect the catalogue.
#[derive(Debug, Parser)]
#[command(name = "catalogue")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CATALOGUE_CONFIG")]
    pub config: Option<String>,

    /// SQLite database file (overrides the configuration)
    #[arg(short, long, global = true, env = "CATALOGUE_DATABASE")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a model record from text and store it
    Extract(ExtractArgs),

    /// Show a stored model record
    Show(ShowArgs),

    /// Run the HTTP extraction service
    Serve(ServeArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Text describing a model
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short = 'i', long, conflicts_with = "text")]
    pub file: Option<String>,

    /// Read the text from stdin
    #[arg(long, conflicts_with_all = ["text", "file"])]
    pub stdin: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Model name (exact match)
    #[arg(required_unless_present = "id")]
    pub name: Option<String>,

    /// Look up by record id instead of name
    #[arg(long, conflicts_with = "name")]
    pub id: Option<i64>,
}

/// Arguments for the serve command.
#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Bind address (overrides the configuration)
    #[arg(long)]
    pub bind_address: Option<String>,

    /// Bind port (overrides the configuration)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Command {
    /// Default log level for the command
    ///
    /// The service logs request handling; one-shot commands keep stderr quiet.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Command::Serve(_) => "info",
            _ => "warn",
        }
    }
}
