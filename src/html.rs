use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::{Position, Url};

// CSS selector strings
const HEAD_LINK_SELECTOR_STR: &str = "head > link";

// The rel attribute is matched manually rather than with `link[rel~=icon]`:
// CSS attribute matching is case-sensitive, while rel tokens are not.
static HEAD_LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(HEAD_LINK_SELECTOR_STR)
        .expect("Failed to parse head link selector - this is a bug")
});

const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Declared icon size parsed from a `sizes` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    /// The literal `any` keyword: a scalable icon, treated as maximal.
    Any,
    /// A `WIDTHxHEIGHT` pair in pixels.
    Pixels {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
}

impl IconSize {
    /// The larger of the two dimensions, with `any` counting as infinite.
    fn max_dimension(self) -> f64 {
        match self {
            IconSize::Any => f64::INFINITY,
            IconSize::Pixels { width, height } => width.max(height) as f64,
        }
    }
}

/// A potential icon discovered in an HTML document, not yet validated by
/// download.
///
/// Candidates only live for the duration of one resolution request and carry no
/// identity beyond structural equality of their fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconCandidate {
    /// Absolute URL of the icon.
    pub url: String,
    /// Trimmed value of the `type` attribute, if present.
    pub mime_type: Option<String>,
    /// Best declared size from the `sizes` attribute, if any token was valid.
    pub declared_size: Option<IconSize>,
}

impl IconCandidate {
    /// Size used for ranking candidates against each other.
    ///
    /// A declared size wins outright. Without one, SVG icons are assumed to be
    /// of maximal quality (they scale), and anything else ranks lowest.
    fn comparable_size(&self) -> f64 {
        match self.declared_size {
            Some(size) => size.max_dimension(),
            None if self.mime_type.as_deref() == Some(SVG_MIME_TYPE) => f64::INFINITY,
            None => 0.0,
        }
    }
}

/// Extracts icon candidates from an HTML document, ranked best-first.
///
/// Selects `<link>` elements under `<head>` whose `rel` attribute contains an
/// `icon` token (case-insensitive token match, so `rel="shortcut icon"`
/// matches and `rel="iconx"` does not). Elements without an `href` are skipped.
/// Malformed markup never fails the whole extraction; the parser recovers and
/// the remaining elements are still considered.
///
/// The returned list is sorted descending by declared size, with unsized SVG
/// icons ranked as maximal and any other unsized icon ranked last. The sort is
/// stable: candidates of equal size stay in document order, which downstream
/// code relies on when attempting downloads.
///
/// # Arguments
///
/// * `html` - The raw HTML document text
/// * `origin` - The URL the document was fetched from, used to absolutize
///   relative hrefs
pub fn extract_icons(html: &str, origin: &Url) -> Vec<IconCandidate> {
    let document = Html::parse_document(html);

    let mut candidates: Vec<IconCandidate> = document
        .select(&HEAD_LINK_SELECTOR)
        .filter(|element| has_icon_rel(element))
        .filter_map(|element| {
            // No href (or a blank one), no candidate.
            let href = element.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }

            let url = normalize_href(href, origin);
            let mime_type = element
                .value()
                .attr("type")
                .map(|mime_type| mime_type.trim().to_string());
            let declared_size = element.value().attr("sizes").and_then(parse_sizes);

            log::info!(
                "Found icon with URL: {url} (type: {}, size: {})",
                mime_type.as_deref().unwrap_or("???"),
                element.value().attr("sizes").unwrap_or("???"),
            );

            Some(IconCandidate {
                url,
                mime_type,
                declared_size,
            })
        })
        .collect();

    // Stable descending sort; ties keep document order.
    candidates.sort_by(|a, b| b.comparable_size().total_cmp(&a.comparable_size()));

    candidates
}

/// Checks whether a link element's `rel` attribute contains an `icon` token.
fn has_icon_rel(element: &ElementRef) -> bool {
    element.value().attr("rel").is_some_and(|rel| {
        rel.split_whitespace()
            .any(|token| token.eq_ignore_ascii_case("icon"))
    })
}

/// Normalizes an icon href to an absolute URL.
///
/// An href starting with `://` gets `https:` prepended (a malformed but
/// observed-in-the-wild form of a protocol-relative URL). An already absolute
/// `http://` or `https://` URL is kept as-is. Anything else is treated as a
/// root-relative path under the origin's scheme and authority - the origin's
/// path is replaced, not joined against.
fn normalize_href(href: &str, origin: &Url) -> String {
    let href = href.trim();

    if href.starts_with("://") {
        return format!("https{href}");
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    format!(
        "{}/{}",
        &origin[..Position::BeforePath],
        href.trim_start_matches('/')
    )
}

/// Parses a `sizes` attribute value.
///
/// The attribute may carry several whitespace-separated tokens; each is either
/// the keyword `any` or a `WIDTHxHEIGHT` pair (case-insensitive `x`). Tokens
/// with non-numeric dimensions or a leading zero are invalid and ignored. When
/// several tokens are valid, the one with the greatest `max(width, height)` is
/// kept. Returns `None` when no token is valid.
fn parse_sizes(sizes: &str) -> Option<IconSize> {
    let mut best: Option<IconSize> = None;

    for token in sizes.split_whitespace() {
        let Some(size) = parse_size_token(token) else {
            continue;
        };
        if best.is_none_or(|current| size.max_dimension() > current.max_dimension()) {
            best = Some(size);
        }
    }

    best
}

fn parse_size_token(token: &str) -> Option<IconSize> {
    if token.eq_ignore_ascii_case("any") {
        return Some(IconSize::Any);
    }

    let (width, height) = token.split_once(['x', 'X'])?;

    Some(IconSize::Pixels {
        width: parse_dimension(width)?,
        height: parse_dimension(height)?,
    })
}

/// Parses one dimension of a size token. Leading zeros are invalid per the
/// HTML spec, which also rules out a bare `0`.
fn parse_dimension(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.starts_with('0') {
        return None;
    }
    if !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
