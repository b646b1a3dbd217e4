//! Catalogue Server binary
//!
//! Starts the HTTP server for model-record extraction.

use catalogue_server::{config::ServerConfig, init_tracing, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using defaults");
        eprintln!("Usage: catalogue-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default()
    };

    start_server(config).await
}

fn print_help() {
    println!("Catalogue Server - Model record extraction service");
    println!();
    println!("USAGE:");
    println!("    catalogue-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address, bind_port: where to listen (default 127.0.0.1:8080)");
    println!("    - database_path: SQLite database file (default catalogue.db)");
    println!("    - [inference]: provider (anthropic|ollama), model, endpoint, api_key");
    println!("    - [extractor]: text length limits, [extractor.retry], [extractor.cache]");
    println!("    - [validation]: anchor_fields, max_field_length, required fields");
    println!();
    println!("ENVIRONMENT:");
    println!("    ANTHROPIC_API_KEY  API key used when inference.api_key is not set");
    println!("    RUST_LOG           Log filter (default: info)");
    println!();
}
