//! Error types for the trawl crate

use thiserror::Error;

/// Result type for trawl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for trawl operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Web crawling error
    #[error("Crawl error: {0}")]
    Crawl(String),

    /// Proxy error
    #[error("Proxy error: {0}")]
    Proxy(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlError;
    use crate::index::DbError;
    use crate::proxy::ProxyError;

    #[test]
    fn test_subsystem_errors_convert() {
        let err: Error = CrawlError::InvalidQuery("Search query is required".to_string()).into();
        assert!(matches!(err, Error::InvalidRequest(ref m) if m == "Search query is required"));

        let err: Error = CrawlError::Persistence(DbError::Query("locked".to_string())).into();
        assert!(matches!(err, Error::Database(_)));

        let err: Error = ProxyError::MissingUrl.into();
        assert_eq!(err.to_string(), "Invalid request: URL is required");

        let err: Error = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
