//! HTTP API Request Handlers
//!
//! Handlers read their bodies as raw bytes. An empty body means "use the
//! defaults"; any other body must be valid JSON for the endpoint or the
//! request is refused with a 400 in the API's own error shape.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::crawler::{CrawlError, CrawlRequest, Crawler, SearchRequest};
use crate::proxy::{ProxiedResponse, Proxy, ProxyError};

use super::types::*;

/// Value of `X-Frame-Options` on every proxy response
const FRAME_OPTIONS: &str = "ALLOWALL";

/// Value of `Content-Security-Policy` on every proxy response
const FRAME_POLICY: &str = "frame-ancestors *";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub crawler: Arc<Crawler>,
    pub proxy: Arc<Proxy>,
}

/// Deserialize a request body, falling back to the defaults when it is empty
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
}

fn invalid_body(err: serde_json::Error) -> Response {
    debug!("Rejected request body: {}", err);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::with_details(
            "Invalid request body",
            err.to_string(),
        )),
    )
        .into_response()
}

/// Map a crawler error to the API's status code and error body
fn crawl_error_response(err: CrawlError) -> Response {
    match err {
        CrawlError::InvalidUrl(message) | CrawlError::InvalidQuery(message) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
        }
        CrawlError::QueueUnavailable(details) => {
            error!("Failed to fetch crawl queue: {}", details);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_details(
                    "Failed to fetch crawl queue",
                    details,
                )),
            )
                .into_response()
        }
        CrawlError::Setup(message) => {
            error!("Request setup failed: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(message)),
            )
                .into_response()
        }
        e => {
            error!("Request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Crawl trigger endpoint
pub async fn crawl(State(state): State<AppState>, body: Bytes) -> Response {
    let request: CrawlRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(e) => return invalid_body(e),
    };
    debug!(
        "HTTP crawl request: url={:?}, max_urls={:?}",
        request.url, request.max_urls
    );

    match state.crawler.run(request).await {
        Ok(report) if report.crawled == 0 => Json(CrawlResponse {
            success: true,
            message: "No URLs to crawl".to_string(),
            crawled: 0,
            results: None,
        })
        .into_response(),
        Ok(report) => Json(CrawlResponse {
            success: true,
            message: format!("Crawled {} URLs", report.crawled),
            crawled: report.crawled,
            results: Some(report.results),
        })
        .into_response(),
        Err(e) => crawl_error_response(e),
    }
}

/// URL submission endpoint
pub async fn submit_url(State(state): State<AppState>, body: Bytes) -> Response {
    let request: SubmitUrlRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(e) => return invalid_body(e),
    };
    let Some(url) = request.url else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("URL is required")),
        )
            .into_response();
    };

    match state.crawler.submit(&url, request.priority).await {
        Ok(submission) => {
            let (status, message) = if submission.created {
                (StatusCode::CREATED, "URL added to crawl queue")
            } else {
                (StatusCode::OK, "URL already in queue, updated priority")
            };
            (
                status,
                Json(SubmitUrlResponse {
                    success: true,
                    message: message.to_string(),
                    data: submission.entry,
                }),
            )
                .into_response()
        }
        Err(e) => crawl_error_response(e),
    }
}

/// Keyword search endpoint
pub async fn search(State(state): State<AppState>, body: Bytes) -> Response {
    let request: SearchRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(e) => return invalid_body(e),
    };

    match state.crawler.search(request).await {
        Ok(results) => Json(SearchResponse {
            success: true,
            results,
        })
        .into_response(),
        Err(e) => crawl_error_response(e),
    }
}

/// Title suggestion endpoint
pub async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Response {
    let query = params.q.unwrap_or_default();
    match state.crawler.suggest(&query).await {
        Ok(suggestions) => Json(suggestions).into_response(),
        Err(e) => crawl_error_response(e),
    }
}

/// Crawl statistics endpoint
pub async fn stats(State(state): State<AppState>) -> Response {
    match state.crawler.stats().await {
        Ok(data) => Json(StatsResponse {
            success: true,
            data,
        })
        .into_response(),
        Err(e) => crawl_error_response(e),
    }
}

/// HTML rewrite proxy endpoint
pub async fn proxy(State(state): State<AppState>, body: Bytes) -> Response {
    let result = match parse_body::<ProxyRequest>(&body) {
        Ok(ProxyRequest { url: Some(url) }) => state.proxy.fetch(&url).await,
        Ok(ProxyRequest { url: None }) => Err(ProxyError::MissingUrl),
        Err(e) => Err(ProxyError::InvalidBody(e.to_string())),
    };

    let frame_headers = [
        (header::X_FRAME_OPTIONS, FRAME_OPTIONS),
        (header::CONTENT_SECURITY_POLICY, FRAME_POLICY),
    ];

    match result {
        Ok(ProxiedResponse {
            content_type, body, ..
        }) => (
            frame_headers,
            [(header::CONTENT_TYPE, content_type)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Proxy request failed: {}", e);
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                frame_headers,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
