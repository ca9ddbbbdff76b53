//! Integration tests for the favicon resolution pipeline.
//!
//! These tests verify the end-to-end orchestration against a mock HTTP origin:
//! - candidate selection and rank-order download attempts
//! - per-candidate skip on validation failure
//! - well-known `/favicon.ico` fallback behavior
//! - classification of network / status / content-type failures

use std::time::Duration;

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use favicon_resolver::{resolve_favicon_at, ResolutionOutcome};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-payload";

fn origin_of(server: &MockServer) -> Url {
    Url::parse(&server.uri()).expect("mock server URI should parse")
}

/// An origin URL on a port nothing is listening on, to provoke transport-level
/// failures.
fn unreachable_origin() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{port}/")).expect("URL should parse")
}

async fn mount_html(server: &MockServer, html: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html"))
        .mount(server)
        .await;
}

async fn mount_png(server: &MockServer, image_path: &str) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_BYTES, "image/png"))
        .mount(server)
        .await;
}

/// End-to-end happy path: one declared candidate, reachable, correct type.
#[tokio::test]
async fn test_resolves_single_html_candidate() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        r#"<html><head><link rel="icon" sizes="32x32" href="/a.png"></head></html>"#,
    )
    .await;
    mount_png(&server, "/a.png").await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    match outcome {
        ResolutionOutcome::Resolved(icon) => {
            assert_eq!(icon.bytes, PNG_BYTES);
            assert!(icon.url.ends_with("/a.png"));
            assert_eq!(icon.content_type.as_deref(), Some("image/png"));
        }
        ResolutionOutcome::NotFound => panic!("expected a resolved icon"),
    }
}

/// The largest declared candidate must be attempted (and win) first.
#[tokio::test]
async fn test_attempts_candidates_in_rank_order() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        r#"<html><head>
            <link rel="icon" sizes="16x16" href="/small.png">
            <link rel="icon" sizes="64x64" href="/large.png">
        </head></html>"#,
    )
    .await;
    mount_png(&server, "/small.png").await;
    mount_png(&server, "/large.png").await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    match outcome {
        ResolutionOutcome::Resolved(icon) => assert!(icon.url.ends_with("/large.png")),
        ResolutionOutcome::NotFound => panic!("expected a resolved icon"),
    }
}

/// A broken top-ranked candidate is skipped, not fatal; the next one wins.
#[tokio::test]
async fn test_skips_failing_candidate_and_continues() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        r#"<html><head>
            <link rel="icon" sizes="64x64" href="/broken.png">
            <link rel="icon" sizes="16x16" href="/working.png">
        </head></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_png(&server, "/working.png").await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    match outcome {
        ResolutionOutcome::Resolved(icon) => assert!(icon.url.ends_with("/working.png")),
        ResolutionOutcome::NotFound => panic!("expected a resolved icon"),
    }
}

/// A candidate with a non-image content type is a download failure, and the
/// next candidate is attempted.
#[tokio::test]
async fn test_skips_wrong_content_type_candidate() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        r#"<html><head>
            <link rel="icon" sizes="64x64" href="/error-page.png">
            <link rel="icon" sizes="16x16" href="/working.png">
        </head></html>"#,
    )
    .await;
    // A 200 that is actually an HTML error page
    Mock::given(method("GET"))
        .and(path("/error-page.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"))
        .mount(&server)
        .await;
    mount_png(&server, "/working.png").await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    match outcome {
        ResolutionOutcome::Resolved(icon) => assert!(icon.url.ends_with("/working.png")),
        ResolutionOutcome::NotFound => panic!("expected a resolved icon"),
    }
}

/// A missing content-type header is permissive: the download is accepted.
#[tokio::test]
async fn test_missing_content_type_is_accepted() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        r#"<html><head><link rel="icon" href="/untyped.ico"></head></html>"#,
    )
    .await;
    // set_body_bytes does not attach a content-type header
    Mock::given(method("GET"))
        .and(path("/untyped.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_BYTES))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    match outcome {
        ResolutionOutcome::Resolved(icon) => {
            assert_eq!(icon.bytes, PNG_BYTES);
            assert_eq!(icon.content_type, None);
        }
        ResolutionOutcome::NotFound => panic!("expected a resolved icon"),
    }
}

/// When every ranked candidate fails, the well-known path is attempted exactly
/// once before giving up.
#[tokio::test]
async fn test_falls_back_to_well_known_exactly_once() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        r#"<html><head>
            <link rel="icon" sizes="32x32" href="/gone-a.png">
            <link rel="icon" sizes="16x16" href="/gone-b.png">
        </head></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone-a.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone-b.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_BYTES, "image/x-icon"))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    match outcome {
        ResolutionOutcome::Resolved(icon) => {
            assert!(icon.url.ends_with("/favicon.ico"));
            assert_eq!(icon.content_type.as_deref(), Some("image/x-icon"));
        }
        ResolutionOutcome::NotFound => panic!("expected the well-known fallback to win"),
    }
}

/// An erroring homepage (status >= 300) means zero candidates, never a fatal
/// condition; the well-known path must still be attempted.
#[tokio::test]
async fn test_html_error_status_still_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_BYTES, "image/x-icon"))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    assert!(matches!(outcome, ResolutionOutcome::Resolved(_)));
}

/// A homepage that fails at the transport level (here: request timeout) must
/// still not prevent the fallback attempt.
#[tokio::test]
async fn test_html_network_error_still_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html></html>", "text/html")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_BYTES, "image/x-icon"))
        .expect(1)
        .mount(&server)
        .await;

    // Short client timeout turns the delayed homepage into a network failure
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()
        .expect("client should build");
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    assert!(matches!(outcome, ResolutionOutcome::Resolved(_)));
}

/// No icon links and a missing well-known icon resolve to NotFound.
#[tokio::test]
async fn test_not_found_when_nothing_validates() {
    let server = MockServer::start().await;
    mount_html(&server, r#"<html><head><title>No icons here</title></head></html>"#).await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    assert_eq!(outcome, ResolutionOutcome::NotFound);
}

/// An unreachable host plus a wrong-content-type `/favicon.ico` is NotFound:
/// wrong content type is a download failure, not a success.
#[tokio::test]
async fn test_wrong_content_type_fallback_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not an image", "text/html"))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    assert_eq!(outcome, ResolutionOutcome::NotFound);
}

/// A completely unreachable origin (connection refused for both phases)
/// resolves to NotFound rather than an error.
#[tokio::test]
async fn test_unreachable_origin_is_not_found() {
    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &unreachable_origin()).await;

    assert_eq!(outcome, ResolutionOutcome::NotFound);
}

/// Relative hrefs in the document resolve against the origin before download.
#[tokio::test]
async fn test_relative_href_resolved_against_origin() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        r#"<html><head><link rel="icon" href="static/deep/icon.png"></head></html>"#,
    )
    .await;
    mount_png(&server, "/static/deep/icon.png").await;

    let client = reqwest::Client::new();
    let outcome = resolve_favicon_at(&client, &origin_of(&server)).await;

    match outcome {
        ResolutionOutcome::Resolved(icon) => {
            assert!(icon.url.ends_with("/static/deep/icon.png"))
        }
        ResolutionOutcome::NotFound => panic!("expected a resolved icon"),
    }
}
