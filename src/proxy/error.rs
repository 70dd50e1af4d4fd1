//! Error types for the rewrite proxy

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for proxy operations
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No target URL was supplied
    #[error("URL is required")]
    MissingUrl,

    /// The request body is not the expected JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The target URL is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The target answered with a non-success status
    #[error("Failed to fetch: {status} {reason}")]
    Upstream {
        /// Upstream HTTP status code
        status: u16,
        /// Canonical reason phrase, empty when unknown
        reason: String,
    },

    /// Transport level failure while talking to the target
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy could not be constructed
    #[error("Setup error: {0}")]
    Setup(String),
}

impl ProxyError {
    /// HTTP status code the proxy answers with for this error
    ///
    /// Upstream failures are mirrored; everything unexpected is a 500.
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::MissingUrl | ProxyError::InvalidBody(_) | ProxyError::InvalidUrl(_) => 400,
            ProxyError::Upstream { status, .. } => *status,
            ProxyError::Http(_) | ProxyError::Setup(_) => 500,
        }
    }
}

impl From<ProxyError> for CrateError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::MissingUrl | ProxyError::InvalidBody(_) | ProxyError::InvalidUrl(_) => {
                CrateError::InvalidRequest(err.to_string())
            }
            ProxyError::Http(e) => CrateError::Http(e),
            _ => CrateError::Proxy(err.to_string()),
        }
    }
}
