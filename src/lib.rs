//! # trawl - Priority Crawl Frontier and Framing Proxy
//!
//! This crate keeps a persisted, priority-ordered crawl frontier, drains it
//! into a store of extracted pages, and serves a rewrite proxy that makes
//! third-party pages displayable inside a frame.
//!
//! ## Features
//!
//! - Crawl queue and page store on an embedded libsql database
//! - Sequential batch crawling with atomic claims, so concurrent invocations
//!   never process the same URL twice
//! - Title, description, language and boilerplate-free text extraction
//! - A deterministic rank heuristic and same-host link discovery
//! - Keyword search over stored pages, ordered by that rank
//! - An HTML rewrite proxy that absolutizes references, injects a `<base>`
//!   element and relays link clicks to the embedding window
//! - An axum HTTP API over all of the above
//!
//! ## Example
//!
//! ```rust,no_run
//! use trawl::crawler::{CrawlRequest, Crawler, CrawlerConfig};
//! use trawl::index::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new_from_path("trawl.db").await?;
//!     let crawler = Crawler::new(db, CrawlerConfig::default())?;
//!
//!     crawler.submit("https://www.rust-lang.org/", Some(8)).await?;
//!     let report = crawler
//!         .run(CrawlRequest {
//!             url: None,
//!             max_urls: Some(5),
//!         })
//!         .await?;
//!
//!     for result in report.results {
//!         println!("{} -> {}", result.url, result.success);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;

pub mod crawler;
pub mod index;
pub mod proxy;
pub mod server;

pub use config::{DEFAULT_LISTEN_ADDR, ServerConfig};
pub use error::Error;

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::config::ServerConfig;
    pub use crate::crawler::{CrawlReport, CrawlRequest, Crawler, CrawlerConfig};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::index::Database;
    pub use crate::proxy::{Proxy, ProxyConfig};
    pub use crate::server::{AppState, HttpServer};
}
