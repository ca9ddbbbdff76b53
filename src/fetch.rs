use log::info;
use reqwest::header::CONTENT_TYPE;

use crate::error_handling::ImageDownloadError;

/// A successfully downloaded and validated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedImage {
    /// The raw response body.
    pub bytes: Vec<u8>,
    /// The declared content-type of the response, if any.
    pub content_type: Option<String>,
}

/// Downloads an image from a URL, validating status and declared content type.
///
/// Fails with [`ImageDownloadError`] on a transport-level error, a response
/// status >= 300, or a content-type header that does not begin with `image/`.
/// A missing content-type header is accepted: plenty of origins serve their
/// favicon without one.
///
/// The operation is idempotent and safe to retry, but this function never
/// retries itself; a caller that wants retries owns that policy.
pub async fn fetch_image(
    client: &reqwest::Client,
    url: &str,
) -> Result<DownloadedImage, ImageDownloadError> {
    info!("Loading image by URL: {url}");

    let response =
        client
            .get(url)
            .send()
            .await
            .map_err(|source| ImageDownloadError::Network {
                url: url.to_string(),
                source,
            })?;

    let status = response.status();
    if status.as_u16() >= 300 {
        info!("Could not load image by URL: {url} ({status})");
        return Err(ImageDownloadError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).to_string());

    if let Some(content_type) = &content_type {
        if !content_type.starts_with("image/") {
            info!("Could not load image by URL: {url} (content type {content_type})");
            return Err(ImageDownloadError::WrongContentType {
                url: url.to_string(),
                content_type: content_type.clone(),
            });
        }
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| ImageDownloadError::Network {
            url: url.to_string(),
            source,
        })?;

    Ok(DownloadedImage {
        bytes: bytes.to_vec(),
        content_type,
    })
}
