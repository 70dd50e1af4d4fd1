//! HTTP API Request/Response Types
//!
//! JSON-serializable bodies of the HTTP API. Crawl and search requests reuse
//! `crate::crawler::CrawlRequest` and `crate::crawler::SearchRequest` directly.

use serde::{Deserialize, Serialize};

use crate::crawler::{SearchResults, UrlResult};
use crate::index::{CrawlQueueEntry, CrawlStats};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: String,
}

/// Crawl response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResponse {
    pub success: bool,
    pub message: String,
    /// Number of URLs attempted
    pub crawled: usize,
    /// Per-URL outcomes, absent when nothing was crawled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<UrlResult>>,
}

/// URL submission request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitUrlRequest {
    #[serde(default)]
    pub url: Option<String>,
    /// Requested priority, clamped to 1..=10 (default: 5)
    #[serde(default)]
    pub priority: Option<i64>,
}

/// URL submission response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitUrlResponse {
    pub success: bool,
    pub message: String,
    /// The queue entry as stored
    pub data: CrawlQueueEntry,
}

/// Proxy request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(flatten)]
    pub results: SearchResults,
}

/// Query string of the suggestion endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestParams {
    pub q: Option<String>,
}

/// Statistics response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: CrawlStats,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Underlying cause, when there is one worth reporting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    pub fn internal_error(details: impl Into<String>) -> Self {
        Self::with_details("Internal server error", details)
    }
}
