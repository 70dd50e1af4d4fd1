//! Crawl queue and page store
//!
//! This module persists the crawl frontier and the pages extracted from it
//! in an embedded libsql database.

mod database;
pub mod error;
mod schema;

pub use database::Database;
pub use error::DbError;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Processing state of a queue entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    /// Waiting to be selected
    Pending,
    /// Claimed by a crawl invocation
    Processing,
    /// Fetched, extracted and stored
    Completed,
    /// The last attempt failed
    Failed,
}

impl QueueStatus {
    /// Column value of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Pending => "pending",
            QueueStatus::Processing => "processing",
            QueueStatus::Completed => "completed",
            QueueStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(QueueStatus::Pending),
            "processing" => Ok(QueueStatus::Processing),
            "completed" => Ok(QueueStatus::Completed),
            "failed" => Ok(QueueStatus::Failed),
            other => Err(DbError::Data(format!("Unknown queue status: {}", other))),
        }
    }
}

/// Represents one URL of the crawl frontier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlQueueEntry {
    /// ID of the entry
    pub id: i64,

    /// URL of the entry, unique across the queue
    pub url: String,

    /// Processing state
    pub status: QueueStatus,

    /// Higher priorities are selected first
    pub priority: i64,

    /// Number of failed attempts
    pub retry_count: i64,

    /// Reason of the last failure
    pub error_message: Option<String>,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the entry was last claimed or finished
    pub processed_at: Option<DateTime<Utc>>,
}

/// Represents the stored, extracted form of a crawled page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedPage {
    /// URL of the page, unique across the store
    pub url: String,

    /// Title of the page
    pub title: String,

    /// Description of the page
    pub description: String,

    /// Extracted body text, bounded in length
    pub content: String,

    /// Hostname without a leading `www.`
    pub domain: String,

    /// Two-letter language code
    pub language: String,

    /// Heuristic rank
    pub page_rank: f64,

    /// When the page was last stored
    pub last_crawled_at: DateTime<Utc>,
}

/// Number of queue entries in one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: QueueStatus,
    pub count: i64,
}

/// Number of indexed pages for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: i64,
}

/// Snapshot of the crawler's stored state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlStats {
    /// Number of indexed pages
    pub indexed_pages: i64,

    /// Number of pending queue entries
    pub queued_urls: i64,

    /// Queue entries per status
    pub queue: Vec<StatusCount>,

    /// Domains with the most indexed pages
    pub top_domains: Vec<DomainCount>,
}

/// A stored page matching a keyword search, without its body text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub description: String,
    pub domain: String,
    pub page_rank: f64,
    pub last_crawled_at: DateTime<Utc>,
}

/// One page of keyword search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Matches in rank order
    pub hits: Vec<SearchHit>,

    /// Number of matching pages across all result pages
    pub total: i64,
}

/// Convert a stored millisecond timestamp
pub(crate) fn from_millis(millis: i64) -> Result<DateTime<Utc>, DbError> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| DbError::Data(format!("Invalid timestamp: {}", millis)))
}
