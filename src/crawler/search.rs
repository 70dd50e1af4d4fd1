//! Keyword search over the page store

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::crawler::config::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT, SUGGESTION_LIMIT};
use crate::crawler::error::CrawlError;
use crate::crawler::orchestrator::Crawler;
use crate::index::SearchHit;

/// Parameters of a keyword search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search terms, matched as one case-insensitive substring
    #[serde(default, alias = "q")]
    pub query: Option<String>,

    /// Page size, clamped to 1..=100 (default: 10)
    #[serde(default)]
    pub limit: Option<i64>,

    /// Number of matches to skip, negative values count as 0
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Position of a result page within all matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total: i64,
    pub pagination: Pagination,
}

/// Title completions for a partial query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub query: String,
    pub suggestions: Vec<String>,
}

impl Crawler {
    /// Search the stored pages, best ranked and most recent first
    #[instrument(skip(self))]
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResults, CrawlError> {
        let query = request.query.as_deref().map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Err(CrawlError::InvalidQuery(
                "Search query is required".to_string(),
            ));
        }

        let limit = request
            .limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        let offset = request.offset.unwrap_or(0).max(0);

        let page = self
            .database()
            .search_pages(query, limit as usize, offset as usize)
            .await?;
        info!(
            "Search for {:?} returned {} of {} matches",
            query,
            page.hits.len(),
            page.total
        );

        Ok(SearchResults {
            query: query.to_string(),
            results: page.hits,
            total: page.total,
            pagination: Pagination {
                limit,
                offset,
                has_more: page.total > offset + limit,
            },
        })
    }

    /// Titles of stored pages containing `query`, empty for a blank query
    pub async fn suggest(&self, query: &str) -> Result<Suggestions, CrawlError> {
        let query = query.trim();
        let suggestions = if query.is_empty() {
            Vec::new()
        } else {
            self.database()
                .suggest_titles(query, SUGGESTION_LIMIT)
                .await?
        };

        Ok(Suggestions {
            query: query.to_string(),
            suggestions,
        })
    }
}
