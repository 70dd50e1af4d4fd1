//! Error types for the crawler module

use std::time::Duration;

use crate::error::Error as CrateError;
use crate::index::DbError;
use thiserror::Error;

/// Error raised while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The target answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase, empty when unknown
        reason: String,
    },

    /// The request did not complete within the fetch timeout
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Transport level failure (DNS, TLS, connection reset, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Fetching the page failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched body could not be treated as an HTML document
    #[error("HTML parsing error: {0}")]
    Parse(String),

    /// Writing crawl results to the store failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] DbError),

    /// Pending entries could not be read from the queue
    #[error("Failed to fetch crawl queue: {0}")]
    QueueUnavailable(String),

    /// The batch could not be assembled at all
    #[error("Setup error: {0}")]
    Setup(String),

    /// The supplied URL is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A search was requested without usable terms
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Another invocation already holds the queue entry
    #[error("URL is already being processed: {0}")]
    AlreadyClaimed(String),
}

impl CrawlError {
    /// Whether this error aborts a whole invocation rather than a single URL
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            CrawlError::QueueUnavailable(_)
                | CrawlError::Setup(_)
                | CrawlError::InvalidUrl(_)
                | CrawlError::InvalidQuery(_)
        )
    }
}

impl From<CrawlError> for CrateError {
    fn from(err: CrawlError) -> Self {
        match err {
            CrawlError::Fetch(FetchError::Http(e)) => CrateError::Http(e),
            CrawlError::InvalidUrl(msg) | CrawlError::InvalidQuery(msg) => {
                CrateError::InvalidRequest(msg)
            }
            CrawlError::Persistence(e) => CrateError::Database(e.to_string()),
            _ => CrateError::Crawl(err.to_string()),
        }
    }
}
