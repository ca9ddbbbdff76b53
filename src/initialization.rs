//! One-time setup of the logger and the shared HTTP client.

use std::time::Duration;

use crate::config::Config;
use crate::error_handling::InitializationError;

/// Initializes the logger at the given level.
pub fn init_logger(level: log::LevelFilter) -> Result<(), InitializationError> {
    env_logger::Builder::new().filter_level(level).try_init()?;
    Ok(())
}

/// Builds the HTTP client used for all outbound fetches.
///
/// The client-level timeout is the only timeout anywhere: the pipeline itself
/// imposes none, and a timed-out request surfaces as an ordinary network
/// failure.
pub fn init_client(config: &Config) -> Result<reqwest::Client, InitializationError> {
    let client = reqwest::ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(&config.user_agent)
        .build()?;
    Ok(client)
}
