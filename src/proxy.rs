//! # HTML Rewrite Proxy
//!
//! Fetches a third-party page with a browser identity and makes it
//! displayable inside a frame of the calling application. HTML is rewritten
//! (see `HtmlRewriter`); any other content passes through untouched.
//!
//! The proxy is stateless. It never touches the crawl queue or the page
//! store and is safe to call concurrently without limit.

mod error;
mod rewrite;

pub use error::ProxyError;
pub use rewrite::{HtmlRewriter, rewrite_html};

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Content type assumed when the target does not send one
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Content type of rewritten documents
pub const REWRITTEN_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Configuration for the proxy
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// User agent announced to the target
    pub user_agent: String,

    /// Accept header sent to the target
    pub accept: String,

    /// Accept-Language header sent to the target
    pub accept_language: String,

    /// Timeout for the whole upstream exchange
    pub timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,\
                     image/avif,image/webp,image/apng,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Builder for ProxyConfig
#[derive(Debug, Default)]
pub struct ProxyConfigBuilder {
    config: ProxyConfig,
}

impl ProxyConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.config.accept = accept.into();
        self
    }

    pub fn accept_language(mut self, accept_language: impl Into<String>) -> Self {
        self.config.accept_language = accept_language.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ProxyConfig {
        self.config
    }
}

impl ProxyConfig {
    /// Create a new builder
    pub fn builder() -> ProxyConfigBuilder {
        ProxyConfigBuilder::new()
    }
}

/// A proxied response body with the content type it should be served as
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    /// Content type to serve the body with
    pub content_type: String,

    /// Response body
    pub body: Vec<u8>,

    /// Whether the body was rewritten as HTML
    pub rewritten: bool,
}

/// Fetches and rewrites pages for framing
#[derive(Debug, Clone)]
pub struct Proxy {
    client: Client,
    rewriter: HtmlRewriter,
}

impl Proxy {
    /// Create a proxy
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(browser_headers(&config)?)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProxyError::Setup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rewriter: HtmlRewriter::new()?,
        })
    }

    /// Fetch `target` and prepare it for framing
    #[instrument(skip(self))]
    pub async fn fetch(&self, target: &str) -> Result<ProxiedResponse, ProxyError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(ProxyError::MissingUrl);
        }
        let url = Url::parse(target).map_err(|e| ProxyError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProxyError::InvalidUrl(format!(
                "Unsupported scheme: {}",
                url.scheme()
            )));
        }

        info!("Proxying {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream answered {} for {}", status, url);
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        if !content_type.to_ascii_lowercase().contains("text/html") {
            let body = response.bytes().await?.to_vec();
            debug!("Passing through {} bytes of {}", body.len(), content_type);
            return Ok(ProxiedResponse {
                content_type,
                body,
                rewritten: false,
            });
        }

        let html = response.text().await?;
        let body = self.rewriter.rewrite(&html, &url).into_bytes();
        debug!("Rewrote {} into {} bytes", url, body.len());

        Ok(ProxiedResponse {
            content_type: REWRITTEN_CONTENT_TYPE.to_string(),
            body,
            rewritten: true,
        })
    }
}

fn browser_headers(config: &ProxyConfig) -> Result<HeaderMap, ProxyError> {
    let value = |v: &str| {
        HeaderValue::from_str(v).map_err(|e| ProxyError::Setup(format!("Invalid header value: {}", e)))
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, value(&config.accept)?);
    headers.insert(header::ACCEPT_LANGUAGE, value(&config.accept_language)?);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn proxy() -> Proxy {
        Proxy::new(ProxyConfig::builder().timeout(Duration::from_secs(5)).build()).unwrap()
    }

    #[tokio::test]
    async fn test_html_is_rewritten_with_browser_identity() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/dir/page.html")
            .match_header("user-agent", Matcher::Regex("Chrome/".to_string()))
            .match_header("accept-language", "en-US,en;q=0.9")
            .with_status(200)
            .with_header("content-type", "text/html; charset=ISO-8859-1")
            .with_body(r#"<html><head></head><body><img src="/logo.png"></body></html>"#)
            .create_async()
            .await;

        let response = proxy()
            .fetch(&format!("{}/dir/page.html", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(response.rewritten);
        assert_eq!(response.content_type, REWRITTEN_CONTENT_TYPE);
        let body = String::from_utf8(response.body).unwrap();
        assert!(body.contains(&format!(r#"src="{}/logo.png""#, server.url())));
        assert!(body.contains(&format!(r#"<base href="{}/" target="_self">"#, server.url())));
    }

    #[tokio::test]
    async fn test_non_html_passes_through_byte_identical() {
        let mut server = Server::new_async().await;
        let png: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff, 0xfe];
        let _mock = server
            .mock("GET", "/logo.png")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(png.clone())
            .create_async()
            .await;

        let response = proxy()
            .fetch(&format!("{}/logo.png", server.url()))
            .await
            .unwrap();

        assert!(!response.rewritten);
        assert_eq!(response.content_type, "image/png");
        assert_eq!(response.body, png);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_surfaced() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let err = proxy()
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Failed to fetch: 404 Not Found");
    }

    #[tokio::test]
    async fn test_missing_and_invalid_urls() {
        let proxy = proxy();

        assert!(matches!(proxy.fetch("  ").await, Err(ProxyError::MissingUrl)));
        assert!(matches!(
            proxy.fetch("not a url").await,
            Err(ProxyError::InvalidUrl(_))
        ));
        assert!(matches!(
            proxy.fetch("file:///etc/passwd").await,
            Err(ProxyError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_target_is_a_server_error() {
        let err = proxy().fetch("http://127.0.0.1:1/").await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
