//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `favicon_resolver` library that handles:
//! - Command-line argument parsing
//! - Logger and HTTP client initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::io::Write;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use favicon_resolver::initialization::{init_client, init_logger};
use favicon_resolver::{resolve_favicon, server, Config, ResolutionOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    init_logger(config.log_level.clone().into()).context("Failed to initialize logger")?;
    let client = init_client(&config).context("Failed to initialize HTTP client")?;

    if let Some(listen) = config.listen {
        return server::serve(listen, client).await;
    }

    // One-shot mode. clap guarantees a domain when --listen is absent.
    let domain = config
        .domain
        .as_deref()
        .context("Missing domain argument")?;

    match resolve_favicon(&client, domain).await {
        Ok(ResolutionOutcome::Resolved(icon)) => {
            match &config.output {
                Some(path) => std::fs::write(path, &icon.bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => std::io::stdout()
                    .write_all(&icon.bytes)
                    .context("Failed to write icon to stdout")?,
            }
            // Summary goes to stderr so stdout stays clean for the raw bytes
            eprintln!(
                "Resolved favicon for {domain}: {} ({} bytes)",
                icon.url,
                icon.bytes.len()
            );
            Ok(())
        }
        Ok(ResolutionOutcome::NotFound) => {
            eprintln!("No favicon found for {domain}");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("favicon_resolver error: {e:#}");
            process::exit(2);
        }
    }
}
