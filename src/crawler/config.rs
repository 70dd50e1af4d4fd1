//! # Crawler Configuration Module
//!
//! Configuration for the crawl pipeline: the identity the fetcher announces,
//! the fetch timeout, extraction limits, frontier growth bounds and the
//! inputs of the rank heuristic. Uses the builder pattern.
//!
//! ## Key Components
//!
//! - `CrawlerConfig`: The main configuration struct
//! - `CrawlerConfigBuilder`: Builder pattern implementation for easier configuration

use std::time::Duration;

/// Priority given to links found on crawled pages
pub const DISCOVERED_PRIORITY: i64 = 3;

/// Priority given to explicit submissions that do not name one
pub const DEFAULT_SUBMIT_PRIORITY: i64 = 5;

/// Lowest and highest priority accepted from a submission
pub const PRIORITY_RANGE: (i64, i64) = (1, 10);

/// Page size of a search that does not name one
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;

/// Largest accepted search page size
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Number of title suggestions returned for a prefix
pub const SUGGESTION_LIMIT: usize = 8;

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// User agent announced to crawled sites
    pub user_agent: String,

    /// Hard timeout for a single page fetch
    pub fetch_timeout: Duration,

    /// Maximum number of characters of body text kept per page
    pub max_content_chars: usize,

    /// Maximum number of same-host links queued per crawled page
    pub max_links_per_page: usize,

    /// Batch size used when the caller does not name one
    pub default_batch_size: usize,

    /// Priority of links found during discovery
    pub discovered_priority: i64,

    /// Priority of explicit submissions without an explicit priority
    pub default_submit_priority: i64,

    /// Domains that earn the reputation bonus (subdomains included)
    pub reputable_domains: Vec<String>,

    /// Elements whose text is never indexed
    pub exclude_selectors: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "trawl-bot/{} (automated crawler)",
                env!("CARGO_PKG_VERSION")
            ),
            fetch_timeout: Duration::from_secs(10),
            max_content_chars: 10_000,
            max_links_per_page: 10,
            default_batch_size: 5,
            discovered_priority: DISCOVERED_PRIORITY,
            default_submit_priority: DEFAULT_SUBMIT_PRIORITY,
            reputable_domains: vec![
                "wikipedia.org".to_string(),
                "mozilla.org".to_string(),
                "github.com".to_string(),
                "stackoverflow.com".to_string(),
            ],
            exclude_selectors: vec![
                "script".to_string(),
                "style".to_string(),
                "nav".to_string(),
                "footer".to_string(),
                "header".to_string(),
            ],
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the fetch timeout
    pub fn fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.config.fetch_timeout = fetch_timeout;
        self
    }

    /// Set the maximum number of content characters kept per page
    pub fn max_content_chars(mut self, max_content_chars: usize) -> Self {
        self.config.max_content_chars = max_content_chars;
        self
    }

    /// Set the maximum number of links queued per page
    pub fn max_links_per_page(mut self, max_links_per_page: usize) -> Self {
        self.config.max_links_per_page = max_links_per_page;
        self
    }

    /// Set the batch size used when none is requested
    pub fn default_batch_size(mut self, default_batch_size: usize) -> Self {
        self.config.default_batch_size = default_batch_size;
        self
    }

    /// Set the priority of discovered links
    pub fn discovered_priority(mut self, discovered_priority: i64) -> Self {
        self.config.discovered_priority = discovered_priority;
        self
    }

    /// Set the default priority of explicit submissions
    pub fn default_submit_priority(mut self, default_submit_priority: i64) -> Self {
        self.config.default_submit_priority = default_submit_priority;
        self
    }

    /// Set the reputable domain allowlist
    pub fn reputable_domains(mut self, reputable_domains: Vec<String>) -> Self {
        self.config.reputable_domains = reputable_domains;
        self
    }

    /// Set the CSS selectors for elements to exclude from indexed text
    pub fn exclude_selectors(mut self, exclude_selectors: Vec<String>) -> Self {
        self.config.exclude_selectors = exclude_selectors;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Clamp a requested submission priority into the accepted range
    pub fn clamp_priority(priority: i64) -> i64 {
        priority.clamp(PRIORITY_RANGE.0, PRIORITY_RANGE.1)
    }
}
