use log::{info, warn};
use url::{Position, Url};

use crate::error_handling::ResolveError;
use crate::fetch::fetch_image;
use crate::html::extract_icons;

/// A successfully resolved site icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    /// The URL the icon was downloaded from.
    pub url: String,
    /// The raw image bytes, suitable for direct HTTP delivery.
    pub bytes: Vec<u8>,
    /// The declared content-type of the download, if the origin sent one.
    pub content_type: Option<String>,
}

/// Terminal outcome of a favicon resolution.
///
/// The transient-failure case is the `Err` side of [`resolve_favicon`];
/// everything the pipeline knows how to classify ends up in one of these two
/// variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// A candidate (or the well-known path) survived validation.
    Resolved(ResolvedIcon),
    /// No candidate validated anywhere, including the well-known fallback.
    NotFound,
}

/// Resolves the best available favicon for a domain.
///
/// Tries HTML link discovery first: downloads `https://{domain}/`, extracts and
/// ranks icon candidates, and attempts them strictly in rank order, skipping
/// any that fail validation. If nothing survives - including when the homepage
/// itself is unreachable or errors - the conventional `/favicon.ico` path is
/// attempted once before giving up with [`ResolutionOutcome::NotFound`].
///
/// Candidates are fetched one at a time, never speculatively in parallel: the
/// goal is "first good enough", not "best of all".
///
/// # Errors
///
/// Returns [`ResolveError`] only when the domain cannot be turned into a URL at
/// all. Download failures of any kind are handled internally and never escape.
pub async fn resolve_favicon(
    client: &reqwest::Client,
    domain: &str,
) -> Result<ResolutionOutcome, ResolveError> {
    let origin = origin_url(domain)?;
    Ok(resolve_favicon_at(client, &origin).await)
}

/// Resolves a favicon starting from an explicit origin URL.
///
/// This is the scheme-agnostic core of [`resolve_favicon`], which always starts
/// from `https://{domain}/`. Taking the origin directly keeps the pipeline
/// exercisable against plain-HTTP test servers.
pub async fn resolve_favicon_at(client: &reqwest::Client, origin: &Url) -> ResolutionOutcome {
    if let Some(icon) = resolve_from_html(client, origin).await {
        return ResolutionOutcome::Resolved(icon);
    }

    info!("Falling back to the well-known favicon path for {origin}");

    match fetch_well_known_icon(client, origin).await {
        Some(icon) => ResolutionOutcome::Resolved(icon),
        None => ResolutionOutcome::NotFound,
    }
}

/// Attempts to resolve an icon via HTML link discovery.
///
/// Any failure in the HTML phase - transport error, status >= 300, unreadable
/// body - is deliberately treated as "zero candidates" rather than a fatal
/// condition, so an unreachable homepage never prevents the well-known
/// fallback from being tried.
async fn resolve_from_html(client: &reqwest::Client, origin: &Url) -> Option<ResolvedIcon> {
    info!("Downloading HTML document to find links to favicons: {origin}");

    let response = match client.get(origin.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Could not load HTML document: {origin} ({e})");
            return None;
        }
    };

    let status = response.status();
    if status.as_u16() >= 300 {
        info!("Could not load HTML document: {origin} ({status})");
        return None;
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Could not read HTML document body: {origin} ({e})");
            return None;
        }
    };

    for candidate in extract_icons(&body, origin) {
        match fetch_image(client, &candidate.url).await {
            Ok(image) => {
                // First validated candidate wins; rank is a priority order,
                // not an exhaustive best-of-all search.
                return Some(ResolvedIcon {
                    url: candidate.url,
                    bytes: image.bytes,
                    content_type: image.content_type.or(candidate.mime_type),
                });
            }
            Err(e) => {
                info!("Skipping icon candidate: {e}");
                continue;
            }
        }
    }

    None
}

/// Attempts the conventional `/favicon.ico` path for an origin.
///
/// A missing or invalid well-known icon is an expected outcome, not an error:
/// every download failure is translated into `None`.
pub async fn fetch_well_known_icon(
    client: &reqwest::Client,
    origin: &Url,
) -> Option<ResolvedIcon> {
    let url = format!("{}/favicon.ico", &origin[..Position::BeforePath]);

    info!("Downloading favicon ICO by well-known URL: {url}");

    match fetch_image(client, &url).await {
        Ok(image) => Some(ResolvedIcon {
            url,
            bytes: image.bytes,
            content_type: image.content_type,
        }),
        Err(e) => {
            info!("No usable well-known favicon: {e}");
            None
        }
    }
}

fn origin_url(domain: &str) -> Result<Url, ResolveError> {
    Url::parse(&format!("https://{domain}/")).map_err(|source| ResolveError::InvalidDomain {
        domain: domain.to_string(),
        source,
    })
}
