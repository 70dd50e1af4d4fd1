//! Crawl orchestration and URL submission

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::crawler::ExtractedPage;
use crate::crawler::config::CrawlerConfig;
use crate::crawler::content_extraction::{check_content_type, extract_page, parse_document};
use crate::crawler::error::CrawlError;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::links::discover_links;
use crate::crawler::ranking::page_rank;
use crate::index::{CrawlQueueEntry, CrawlStats, Database, IndexedPage};

/// Number of domains reported by `Crawler::stats`
const TOP_DOMAINS: usize = 5;

/// Parameters of one crawl invocation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    /// Crawl exactly this URL instead of draining the queue
    pub url: Option<String>,

    /// Upper bound on the number of queue entries taken
    pub max_urls: Option<usize>,
}

/// Outcome of one URL of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlResult {
    pub url: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of one crawl invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Number of URLs attempted
    pub crawled: usize,

    /// Per-URL results in processing order
    pub results: Vec<UrlResult>,
}

/// Outcome of an explicit URL submission
#[derive(Debug, Clone)]
pub struct Submission {
    /// The entry as stored after the submission
    pub entry: CrawlQueueEntry,

    /// Whether the URL was new to the queue
    pub created: bool,
}

/// Check that a caller supplied URL is an absolute http(s) URL
pub fn validate_url(raw: &str) -> Result<Url, CrawlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CrawlError::InvalidUrl("URL is required".to_string()));
    }

    let url = Url::parse(raw).map_err(|_| CrawlError::InvalidUrl("Invalid URL format".to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(CrawlError::InvalidUrl(
            "Only HTTP and HTTPS URLs are allowed".to_string(),
        )),
    }
}

/// Drains the crawl queue into the page store
#[derive(Clone)]
pub struct Crawler {
    db: Database,
    fetcher: PageFetcher,
    config: CrawlerConfig,
}

impl Crawler {
    /// Create a crawler over a database
    pub fn new(db: Database, config: CrawlerConfig) -> Result<Self, CrawlError> {
        let fetcher = PageFetcher::new(&config)?;
        Ok(Self {
            db,
            fetcher,
            config,
        })
    }

    /// The crawler's configuration
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// The underlying queue and page store
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Add a URL to the queue, or reprioritize it if it is already known
    #[instrument(skip(self))]
    pub async fn submit(&self, url: &str, priority: Option<i64>) -> Result<Submission, CrawlError> {
        let url = validate_url(url)?;
        let priority =
            CrawlerConfig::clamp_priority(priority.unwrap_or(self.config.default_submit_priority));

        let (entry, created) = self
            .db
            .submit_entry(url.as_str(), priority, Utc::now())
            .await?;

        if created {
            info!("Queued {} with priority {}", entry.url, entry.priority);
        } else {
            info!("Requeued {} with priority {}", entry.url, entry.priority);
        }

        Ok(Submission { entry, created })
    }

    /// Run one crawl invocation
    ///
    /// Returns `Err` only when the batch cannot be assembled. Every per-URL
    /// failure is recorded on the queue entry and reported in the results.
    #[instrument(skip(self))]
    pub async fn run(&self, request: CrawlRequest) -> Result<CrawlReport, CrawlError> {
        let batch = match request.url.as_deref() {
            Some(url) => vec![self.explicit_batch(url).await?],
            None => {
                let limit = request.max_urls.unwrap_or(self.config.default_batch_size);
                self.db
                    .pending_entries(limit)
                    .await
                    .map_err(|e| CrawlError::QueueUnavailable(e.to_string()))?
                    .into_iter()
                    .map(|entry| entry.url)
                    .collect()
            }
        };

        if batch.is_empty() {
            info!("No URLs to crawl");
            return Ok(CrawlReport::default());
        }

        info!("Crawling {} URLs", batch.len());
        let mut results = Vec::with_capacity(batch.len());
        for url in batch {
            let result = match self.crawl_one(&url).await {
                Ok(discovered) => {
                    debug!("Crawled {} ({} new links)", url, discovered);
                    UrlResult {
                        url,
                        success: true,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!("Failed to crawl {}: {}", url, e);
                    UrlResult {
                        url,
                        success: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.success).count();
        info!("Crawled {} URLs, {} succeeded", results.len(), succeeded);

        Ok(CrawlReport {
            crawled: results.len(),
            results,
        })
    }

    /// Summarize the queue and the page store
    pub async fn stats(&self) -> Result<CrawlStats, CrawlError> {
        Ok(self.db.stats(TOP_DOMAINS).await?)
    }

    /// Make sure an explicitly requested URL has a pending queue entry
    async fn explicit_batch(&self, url: &str) -> Result<String, CrawlError> {
        let url = validate_url(url)?;
        let (entry, _) = self
            .db
            .submit_entry(
                url.as_str(),
                self.config.default_submit_priority,
                Utc::now(),
            )
            .await
            .map_err(|e| CrawlError::Setup(format!("Failed to queue {}: {}", url, e)))?;

        Ok(entry.url)
    }

    /// Claim and process a single URL, returning the number of newly queued links
    #[instrument(skip(self))]
    async fn crawl_one(&self, url: &str) -> Result<usize, CrawlError> {
        if !self.db.claim_entry(url, Utc::now()).await? {
            return Err(CrawlError::AlreadyClaimed(url.to_string()));
        }

        match self.process(url).await {
            Ok(discovered) => Ok(discovered),
            Err(e) => {
                if let Err(db_err) = self.db.fail_entry(url, &e.to_string(), Utc::now()).await {
                    error!("Failed to record failure of {}: {}", url, db_err);
                }
                Err(e)
            }
        }
    }

    async fn process(&self, url: &str) -> Result<usize, CrawlError> {
        let page_url = Url::parse(url).map_err(|e| CrawlError::InvalidUrl(e.to_string()))?;
        let fetched = self.fetcher.fetch(url).await?;
        check_content_type(fetched.content_type.as_deref())?;

        let (
            ExtractedPage {
                title,
                description,
                content,
                language,
                domain,
            },
            links,
        ) = self.analyze(&page_url, &fetched.body)?;
        let rank = page_rank(&content, &title, &domain, &self.config.reputable_domains);

        let now = Utc::now();
        self.db
            .upsert_page(&IndexedPage {
                url: url.to_string(),
                title,
                description,
                content,
                domain,
                language,
                page_rank: rank,
                last_crawled_at: now,
            })
            .await?;
        self.db.complete_entry(url, now).await?;

        let mut discovered = 0;
        for link in links {
            match self
                .db
                .enqueue_if_absent(&link, self.config.discovered_priority, Utc::now())
                .await
            {
                Ok(true) => discovered += 1,
                Ok(false) => {}
                Err(e) => warn!("Failed to queue discovered link {}: {}", link, e),
            }
        }

        Ok(discovered)
    }

    /// Extract the page and its same-host links
    ///
    /// The parsed document is not `Send`, so it never lives across an await.
    fn analyze(&self, page_url: &Url, body: &str) -> Result<(ExtractedPage, Vec<String>), CrawlError> {
        let document = parse_document(body)?;
        let extracted = extract_page(
            page_url,
            &document,
            &self.config.exclude_selectors,
            self.config.max_content_chars,
        )?;
        let links = discover_links(&document, page_url, self.config.max_links_per_page)?;

        Ok((extracted, links))
    }
}
