use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// A single validated image download failed.
///
/// Every variant records the URL that was being downloaded. These errors are
/// recovered locally by the resolution pipeline: a failed candidate is skipped,
/// a failed well-known fetch becomes "not found". They never surface to callers
/// of [`crate::resolve_favicon`].
#[derive(Error, Debug)]
pub enum ImageDownloadError {
    /// Transport-level failure reaching the origin (includes request timeouts
    /// and aborted connections).
    #[error("network error while downloading {url}: {source}")]
    Network {
        /// The image URL that could not be reached.
        url: String,
        /// The underlying transport error.
        #[source]
        source: ReqwestError,
    },

    /// The origin answered with a non-success status (>= 300).
    #[error("unexpected status {status} while downloading {url}")]
    BadStatus {
        /// The image URL that was downloaded.
        url: String,
        /// The HTTP status code of the response.
        status: u16,
    },

    /// The response declared a content type that is not `image/*`. A missing
    /// content-type header does not trigger this - absence is permissive.
    #[error("declared content type {content_type:?} of {url} is not an image")]
    WrongContentType {
        /// The image URL that was downloaded.
        url: String,
        /// The declared content-type header value.
        content_type: String,
    },
}

impl ImageDownloadError {
    /// The URL whose download failed.
    pub fn url(&self) -> &str {
        match self {
            ImageDownloadError::Network { url, .. }
            | ImageDownloadError::BadStatus { url, .. }
            | ImageDownloadError::WrongContentType { url, .. } => url,
        }
    }
}

/// Fatal resolution errors.
///
/// Unlike [`ImageDownloadError`], these are not recovered by the pipeline and
/// map to a 500-class response at the HTTP boundary.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The domain string could not be turned into a URL.
    #[error("could not build a URL for domain {domain:?}: {source}")]
    InvalidDomain {
        /// The offending domain input.
        domain: String,
        /// The underlying URL parse error.
        #[source]
        source: url::ParseError,
    },
}
