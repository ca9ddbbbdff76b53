//! Command-line configuration and tunable constants.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Default timeout for outbound HTTP requests, in seconds.
///
/// The core pipeline imposes no timeout of its own; this is applied at the
/// client level and surfaces as an ordinary network failure.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// How long clients may cache a successfully resolved icon (14 days).
pub const ICON_CACHE_MAX_AGE_SECS: u64 = 14 * 24 * 60 * 60;

/// Default User-Agent string for HTTP requests.
///
/// Uses a generic Chrome-like string without a specific version number to avoid
/// becoming outdated. Some origins serve different (or no) icon markup to
/// clients that look like bots. Users can override this via `--user-agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Log verbosity levels for the CLI.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    Info,
    /// Debug messages.
    Debug,
    /// Everything.
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Command-line configuration.
///
/// The binary runs in one of two modes: one-shot resolution of a single domain
/// (positional argument, icon bytes written to stdout or `--output`), or HTTP
/// server mode (`--listen`), exposing `GET /favicon?domain=...`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "favicon_resolver",
    about = "Resolves the best available favicon for a domain"
)]
pub struct Config {
    /// Domain to resolve a favicon for (one-shot mode)
    #[arg(required_unless_present = "listen", conflicts_with = "listen")]
    pub domain: Option<String>,

    /// Serve the HTTP API on this address instead of resolving a single domain
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// Write the resolved icon to this file instead of stdout (one-shot mode)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Timeout for outbound HTTP requests, in seconds
    #[arg(long, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// User-Agent header for outbound HTTP requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}
