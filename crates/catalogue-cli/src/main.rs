//! Catalogue CLI - Extract model records from text.

use catalogue_cli::{execute, init_tracing, Cli};
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.command.default_log_level());

    match execute(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}
