//! HTTP entry point for the favicon resolution pipeline.
//!
//! One real endpoint: `GET /favicon?domain=example.com` returns the raw icon
//! bytes with long-lived cache directives, or an RFC 7807 style problem
//! response. Everything else is a 404 problem response.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use log::{error, info};
use serde::Deserialize;

use crate::config::ICON_CACHE_MAX_AGE_SECS;
use crate::resolve::{resolve_favicon, ResolutionOutcome};

/// Shared state for the favicon server.
#[derive(Clone)]
pub struct AppState {
    /// HTTP client used for all outbound fetches.
    pub client: reqwest::Client,
}

/// Query parameters for the `/favicon` endpoint.
#[derive(Deserialize)]
struct FaviconParams {
    domain: Option<String>,
}

/// Builds the router for the favicon service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/favicon", get(favicon_handler))
        .fallback(endpoint_not_found_response)
        .with_state(state)
}

/// Serves the favicon API on the given address until the task is aborted.
pub async fn serve(listen: SocketAddr, client: reqwest::Client) -> Result<()> {
    let router = build_router(AppState { client });
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("Failed to bind {listen}"))?;

    info!("Serving favicon API on {listen}");

    axum::serve(listener, router)
        .await
        .context("HTTP server error")?;
    Ok(())
}

async fn favicon_handler(
    State(state): State<AppState>,
    Query(params): Query<FaviconParams>,
) -> Response {
    let Some(domain) = params.domain else {
        return missing_required_parameter_response("domain");
    };

    match resolve_favicon(&state.client, &domain).await {
        Ok(ResolutionOutcome::Resolved(icon)) => icon_response(icon.bytes, icon.content_type),
        Ok(ResolutionOutcome::NotFound) => website_icon_loading_error_response(),
        Err(e) => {
            error!("Favicon resolution failed for {domain}: {e}");
            internal_server_error_response()
        }
    }
}

fn icon_response(bytes: Vec<u8>, content_type: Option<String>) -> Response {
    let mut builder = Response::builder().status(StatusCode::OK).header(
        header::CACHE_CONTROL,
        format!("public, max-age={ICON_CACHE_MAX_AGE_SECS}"),
    );

    // Echo the origin's declared type when it is a usable header value.
    if let Some(value) = content_type
        .as_deref()
        .and_then(|content_type| HeaderValue::from_str(content_type).ok())
    {
        builder = builder.header(header::CONTENT_TYPE, value);
    }

    builder
        .body(Body::from(bytes))
        .unwrap_or_else(|_| internal_server_error_response())
}

/// Builds an `application/problem+json` response.
fn api_problem_response(status: StatusCode, problem_type: &str, detail: &str) -> Response {
    let body = serde_json::json!({
        "status": status.as_u16(),
        "type": problem_type,
        "detail": detail,
    });

    (
        status,
        [(
            header::CONTENT_TYPE,
            "application/problem+json; charset=UTF-8",
        )],
        body.to_string(),
    )
        .into_response()
}

fn missing_required_parameter_response(parameter_name: &str) -> Response {
    api_problem_response(
        StatusCode::BAD_REQUEST,
        "missing_required_parameter",
        &format!("Missing required query-parameter: {parameter_name}"),
    )
}

fn website_icon_loading_error_response() -> Response {
    api_problem_response(
        StatusCode::NOT_FOUND,
        "website_icon_loading_error",
        "Could not load website icon for unknown reason.",
    )
}

async fn endpoint_not_found_response() -> Response {
    api_problem_response(
        StatusCode::NOT_FOUND,
        "endpoint_not_found",
        "The requested URL does not exist.",
    )
}

fn internal_server_error_response() -> Response {
    api_problem_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_server_error",
        "Something went wrong.",
    )
}
