#![cfg(not(tarpaulin_include))]

use crossword::app;
use crossword::config::ServerConfig;

/// Main entry point for the crossword web service
///
/// Serves the puzzle registry plus the compile and symmetry endpoints.
///
/// # Configuration
/// * `CROSSWORD_ADDR` - bind address, defaults to `127.0.0.1:3000`
/// * `RUST_LOG` - log level for `env_logger`
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env();
    app::run(config).await
}
