//! Profile Registry - Entry Point
//!
//! Registers users with a profile picture and serves lookups over HTTP.

use log::{error, info};
use std::process::ExitCode;

use profile_registry::Server;
use profile_registry::config::ServerConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // env_logger picks up RUST_LOG
    env_logger::init();

    info!("Launching profile registry...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.start().await {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
