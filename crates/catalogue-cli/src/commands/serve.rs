//! Serve command implementation.

use super::EXIT_SUCCESS;
use crate::cli::ServeArgs;
use crate::error::Result;
use catalogue_server::config::ServerConfig;
use catalogue_server::start_server;

/// Execute the serve command.
///
/// Runs until the server stops.
pub async fn execute_serve(args: ServeArgs, mut config: ServerConfig) -> Result<i32> {
    apply_overrides(&args, &mut config);
    start_server(config).await?;
    Ok(EXIT_SUCCESS)
}

fn apply_overrides(args: &ServeArgs, config: &mut ServerConfig) {
    if let Some(address) = &args.bind_address {
        config.bind_address = address.clone();
    }
    if let Some(port) = args.port {
        config.bind_port = port;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let mut config = ServerConfig::default();
        let args = ServeArgs {
            bind_address: Some("0.0.0.0".to_string()),
            port: Some(9000),
        };
        apply_overrides(&args, &mut config);
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = ServerConfig::default();
        apply_overrides(
            &ServeArgs {
                bind_address: None,
                port: None,
            },
            &mut config,
        );
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
