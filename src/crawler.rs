//! # Crawl Pipeline
//!
//! This module grows and drains the persisted crawl frontier. Each selected
//! URL is fetched, reduced to its indexable fields, scored, stored, and its
//! same-host links are fed back into the queue.
//!
//! ## Key Components
//!
//! - `Crawler`: Orchestrates a batch and handles explicit URL submissions
//! - `CrawlerConfig`: Crawler identity, limits and scoring inputs
//! - `PageFetcher`: Bounded GET with the crawler's user agent
//! - Content extraction, rank scoring and link discovery as plain functions
//! - Keyword search and title suggestions over the stored pages, in rank order
//!
//! ## Failure model
//!
//! A URL that fails at any step is marked `failed` on its queue entry and
//! reported in the batch results; it never aborts the batch. Only errors
//! that prevent assembling the batch surface as an `Err` from `Crawler::run`.

mod config;
mod content_extraction;
mod error;
mod fetcher;
mod links;
mod orchestrator;
mod ranking;
mod search;

pub use config::{
    CrawlerConfig, CrawlerConfigBuilder, DEFAULT_SEARCH_LIMIT, DEFAULT_SUBMIT_PRIORITY,
    DISCOVERED_PRIORITY, MAX_SEARCH_LIMIT, PRIORITY_RANGE, SUGGESTION_LIMIT,
};
pub use content_extraction::{check_content_type, extract_page, page_domain, parse_document};
pub use error::{CrawlError, FetchError};
pub use fetcher::{FetchedPage, PageFetcher};
pub use links::discover_links;
pub use orchestrator::{
    CrawlReport, CrawlRequest, Crawler, Submission, UrlResult, validate_url,
};
pub use ranking::{is_reputable, page_rank};
pub use search::{Pagination, SearchRequest, SearchResults, Suggestions};

use serde::{Deserialize, Serialize};

/// The indexable fields extracted from one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// Title of the page
    pub title: String,

    /// Meta or OpenGraph description, empty when absent
    pub description: String,

    /// Boilerplate-free body text
    pub content: String,

    /// Two-letter language code
    pub language: String,

    /// Hostname without a leading `www.`
    pub domain: String,
}
