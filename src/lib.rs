//! favicon_resolver library: best-available favicon resolution
//!
//! Given a domain name, this library finds the highest-quality favicon it can:
//! it downloads the site's homepage, extracts and ranks `<link rel~="icon">`
//! candidates, attempts them in rank order with validated downloads, and falls
//! back to the conventional `/favicon.ico` path when nothing else survives.
//!
//! # Example
//!
//! ```no_run
//! use favicon_resolver::{resolve_favicon, ResolutionOutcome};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//!
//! match resolve_favicon(&client, "example.com").await? {
//!     ResolutionOutcome::Resolved(icon) => {
//!         println!("Resolved {} ({} bytes)", icon.url, icon.bytes.len());
//!     }
//!     ResolutionOutcome::NotFound => println!("No favicon found"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
mod fetch;
mod html;
pub mod initialization;
mod resolve;
pub mod server;

// Re-export public API
pub use config::{Config, LogLevel};
pub use error_handling::{ImageDownloadError, InitializationError, ResolveError};
pub use fetch::{fetch_image, DownloadedImage};
pub use html::{extract_icons, IconCandidate, IconSize};
pub use resolve::{
    fetch_well_known_icon, resolve_favicon, resolve_favicon_at, ResolutionOutcome, ResolvedIcon,
};
