//! Page fetching for the crawl pipeline
//!
//! One bounded GET per call, announced with the crawler's own user agent.
//! There is no retry here; a failed fetch is recorded on the queue entry and
//! retried only when the entry is selected again.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::crawler::config::CrawlerConfig;
use crate::crawler::error::{CrawlError, FetchError};

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Value of the Content-Type header, if any
    pub content_type: Option<String>,

    /// Decoded response body
    pub body: String,
}

/// HTTP fetcher with the crawler identity
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    /// Create a fetcher from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| CrawlError::Setup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: config.fetch_timeout,
        })
    }

    /// Fetch a page, failing on transport errors, timeouts and non-2xx answers
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response.text().await.map_err(|e| self.classify(e))?;
        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(FetchedPage {
            content_type,
            body,
        })
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Http(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_sends_crawler_identity() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("user-agent", "test-bot/1.0")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><title>Hello</title></html>")
            .expect(1)
            .create_async()
            .await;

        let config = CrawlerConfig::builder().user_agent("test-bot/1.0").build();
        let fetcher = PageFetcher::new(&config).unwrap();

        let page = fetcher
            .fetch(&format!("{}/page", server.url()))
            .await
            .unwrap();

        assert_eq!(
            page.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
        assert!(page.body.contains("<title>Hello</title>"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_reports_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = PageFetcher::new(&CrawlerConfig::default()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.url())).await;

        match result {
            Err(FetchError::Status { status, reason }) => {
                assert_eq!(status, 404);
                assert_eq!(reason, "Not Found");
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_times_out_on_silent_server() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let config = CrawlerConfig::builder()
            .fetch_timeout(Duration::from_millis(100))
            .build();
        let fetcher = PageFetcher::new(&config).unwrap();

        let result = fetcher.fetch(&format!("http://{}/slow", addr)).await;

        match result {
            Err(FetchError::Timeout(after)) => assert_eq!(after, Duration::from_millis(100)),
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let fetcher = PageFetcher::new(&CrawlerConfig::default()).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:1/unreachable").await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
