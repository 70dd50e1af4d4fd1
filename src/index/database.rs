//! Database operations for the crawl queue and page store

use crate::index::error::DbError;
use crate::index::schema;
use crate::index::{
    CrawlQueueEntry, CrawlStats, DomainCount, IndexedPage, QueueStatus, SearchHit, SearchPage,
    StatusCount, from_millis,
};
use chrono::{DateTime, Utc};
use libsql::{Connection, Row, Rows, params};
use tracing::{debug, instrument};

const ENTRY_COLUMNS: &str =
    "id, url, status, priority, retry_count, error_message, created_at, processed_at";

const PAGE_COLUMNS: &str =
    "url, title, description, content, domain, language, page_rank, last_crawled_at";

const HIT_COLUMNS: &str = "url, title, description, domain, page_rank, last_crawled_at";

/// Case-insensitive substring match on any of the searchable page fields
const SEARCH_FILTER: &str = "title LIKE ?1 ESCAPE '\\'
    OR description LIKE ?1 ESCAPE '\\'
    OR content LIKE ?1 ESCAPE '\\'";

/// Database manager for the crawl queue and page store
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create a new database manager
    #[instrument(skip(conn))]
    pub async fn new(conn: Connection) -> Result<Self, DbError> {
        schema::initialize_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Create a new database manager from a path
    pub async fn new_from_path(path: &str) -> Result<Self, DbError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DbError::Connection(format!("Failed to open database: {}", e)))?;

        let conn = db
            .connect()
            .map_err(|e| DbError::Connection(format!("Failed to connect to database: {}", e)))?;

        Self::new(conn).await
    }

    /// Execute a custom query with parameters
    pub async fn execute_query<P>(&self, sql: &str, params: P) -> Result<Rows, DbError>
    where
        P: libsql::params::IntoParams,
    {
        self.conn
            .query(sql, params)
            .await
            .map_err(|e| DbError::Query(format!("Failed to execute query: {}", e)))
    }

    /// Pending entries in selection order: highest priority first, oldest first within a priority
    #[instrument(skip(self))]
    pub async fn pending_entries(&self, limit: usize) -> Result<Vec<CrawlQueueEntry>, DbError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM crawl_queue
             WHERE status = 'pending'
             ORDER BY priority DESC, created_at ASC, id ASC
             LIMIT ?"
        );
        let mut rows = self
            .conn
            .query(&sql, params![limit as i64])
            .await
            .map_err(|e| DbError::Query(format!("Failed to select pending entries: {}", e)))?;

        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(self.row_to_entry(&row)?);
        }

        Ok(entries)
    }

    /// Get a queue entry by URL
    pub async fn get_entry(&self, url: &str) -> Result<Option<CrawlQueueEntry>, DbError> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM crawl_queue WHERE url = ?");
        let mut rows = self
            .conn
            .query(&sql, params![url])
            .await
            .map_err(|e| DbError::Query(format!("Failed to get queue entry: {}", e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(self.row_to_entry(&row)?)),
            None => Ok(None),
        }
    }

    /// Move a pending entry to processing
    ///
    /// The status check and the write are one statement, so of several
    /// concurrent claimers exactly one sees `true`.
    pub async fn claim_entry(&self, url: &str, now: DateTime<Utc>) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute(
                "UPDATE crawl_queue SET status = 'processing', processed_at = ?
                 WHERE url = ? AND status = 'pending'",
                params![now.timestamp_millis(), url],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to claim queue entry: {}", e)))?;

        Ok(changed == 1)
    }

    /// Mark an entry as completed
    pub async fn complete_entry(&self, url: &str, now: DateTime<Utc>) -> Result<(), DbError> {
        self.conn
            .execute(
                "UPDATE crawl_queue
                 SET status = 'completed', processed_at = ?, error_message = NULL
                 WHERE url = ?",
                params![now.timestamp_millis(), url],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to complete queue entry: {}", e)))?;

        Ok(())
    }

    /// Mark an entry as failed and count the attempt
    pub async fn fail_entry(
        &self,
        url: &str,
        error_message: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DbError> {
        self.conn
            .execute(
                "UPDATE crawl_queue
                 SET status = 'failed', error_message = ?, retry_count = retry_count + 1,
                     processed_at = ?
                 WHERE url = ?",
                params![error_message, now.timestamp_millis(), url],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to mark queue entry as failed: {}", e)))?;

        Ok(())
    }

    /// Add a discovered URL unless the queue already knows it
    ///
    /// Returns whether a new entry was created.
    pub async fn enqueue_if_absent(
        &self,
        url: &str,
        priority: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        let inserted = self
            .conn
            .execute(
                "INSERT INTO crawl_queue (url, status, priority, retry_count, created_at)
                 VALUES (?, 'pending', ?, 0, ?)
                 ON CONFLICT(url) DO NOTHING",
                params![url, priority, now.timestamp_millis()],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to enqueue URL: {}", e)))?;

        Ok(inserted == 1)
    }

    /// Add an explicitly submitted URL, or reprioritize and reset it in place
    ///
    /// An entry currently being processed keeps its status so the running
    /// claim stays valid. Returns the stored entry and whether it is new.
    pub async fn submit_entry(
        &self,
        url: &str,
        priority: i64,
        now: DateTime<Utc>,
    ) -> Result<(CrawlQueueEntry, bool), DbError> {
        let inserted = self.enqueue_if_absent(url, priority, now).await?;

        if !inserted {
            self.conn
                .execute(
                    "UPDATE crawl_queue
                     SET priority = ?,
                         status = CASE WHEN status = 'processing' THEN status ELSE 'pending' END
                     WHERE url = ?",
                    params![priority, url],
                )
                .await
                .map_err(|e| DbError::Query(format!("Failed to update queue entry: {}", e)))?;
        }

        let entry = self
            .get_entry(url)
            .await?
            .ok_or_else(|| DbError::Data(format!("Queue entry vanished: {}", url)))?;

        Ok((entry, inserted))
    }

    /// Insert or overwrite the page stored for a URL
    #[instrument(skip(self, page), fields(url = %page.url))]
    pub async fn upsert_page(&self, page: &IndexedPage) -> Result<(), DbError> {
        self.conn
            .execute(
                "INSERT INTO indexed_pages
                    (url, title, description, content, domain, language, page_rank, last_crawled_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(url) DO UPDATE SET
                    title = excluded.title,
                    description = excluded.description,
                    content = excluded.content,
                    domain = excluded.domain,
                    language = excluded.language,
                    page_rank = excluded.page_rank,
                    last_crawled_at = excluded.last_crawled_at",
                params![
                    page.url.clone(),
                    page.title.clone(),
                    page.description.clone(),
                    page.content.clone(),
                    page.domain.clone(),
                    page.language.clone(),
                    page.page_rank,
                    page.last_crawled_at.timestamp_millis(),
                ],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to upsert page: {}", e)))?;

        debug!("Stored page {}", page.url);
        Ok(())
    }

    /// Get a stored page by URL
    pub async fn get_page(&self, url: &str) -> Result<Option<IndexedPage>, DbError> {
        let sql = format!("SELECT {PAGE_COLUMNS} FROM indexed_pages WHERE url = ?");
        let mut rows = self
            .conn
            .query(&sql, params![url])
            .await
            .map_err(|e| DbError::Query(format!("Failed to get page: {}", e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(self.row_to_page(&row)?)),
            None => Ok(None),
        }
    }

    /// Pages whose title, description or content contain `query`, best ranked first
    ///
    /// Matching is case-insensitive for ASCII letters. Ties on rank go to
    /// the most recently crawled page.
    #[instrument(skip(self))]
    pub async fn search_pages(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchPage, DbError> {
        let pattern = like_pattern(query);

        let sql = format!("SELECT COUNT(*) FROM indexed_pages WHERE {SEARCH_FILTER}");
        let mut rows = self
            .conn
            .query(&sql, params![pattern.clone()])
            .await
            .map_err(|e| DbError::Query(format!("Failed to count search results: {}", e)))?;
        let total = match rows.next().await? {
            Some(row) => row.get(0)?,
            None => 0,
        };

        let sql = format!(
            "SELECT {HIT_COLUMNS} FROM indexed_pages
             WHERE {SEARCH_FILTER}
             ORDER BY page_rank DESC, last_crawled_at DESC, id ASC
             LIMIT ?2 OFFSET ?3"
        );
        let mut rows = self
            .conn
            .query(&sql, params![pattern, limit as i64, offset as i64])
            .await
            .map_err(|e| DbError::Query(format!("Failed to search pages: {}", e)))?;

        let mut hits = Vec::new();
        while let Some(row) = rows.next().await? {
            hits.push(SearchHit {
                url: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                domain: row.get(3)?,
                page_rank: row.get(4)?,
                last_crawled_at: from_millis(row.get(5)?)?,
            });
        }

        debug!("Search for {:?} matched {} pages", query, total);
        Ok(SearchPage { hits, total })
    }

    /// Non-empty titles containing `query`, best ranked first
    pub async fn suggest_titles(&self, query: &str, limit: usize) -> Result<Vec<String>, DbError> {
        let mut rows = self
            .conn
            .query(
                "SELECT title FROM indexed_pages
                 WHERE title LIKE ?1 ESCAPE '\\' AND title <> ''
                 ORDER BY page_rank DESC, last_crawled_at DESC
                 LIMIT ?2",
                params![like_pattern(query), limit as i64],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to suggest titles: {}", e)))?;

        let mut titles = Vec::new();
        while let Some(row) = rows.next().await? {
            titles.push(row.get(0)?);
        }
        Ok(titles)
    }

    /// Summarize the queue and the store
    #[instrument(skip(self))]
    pub async fn stats(&self, top_domains: usize) -> Result<CrawlStats, DbError> {
        let indexed_pages = self.count("SELECT COUNT(*) FROM indexed_pages").await?;

        let mut rows = self
            .conn
            .query(
                "SELECT status, COUNT(*) FROM crawl_queue GROUP BY status ORDER BY status",
                params![],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to count queue entries: {}", e)))?;

        let mut queue = Vec::new();
        while let Some(row) = rows.next().await? {
            queue.push(StatusCount {
                status: row.get::<String>(0)?.parse()?,
                count: row.get(1)?,
            });
        }

        let queued_urls = queue
            .iter()
            .find(|c| c.status == QueueStatus::Pending)
            .map(|c| c.count)
            .unwrap_or(0);

        let mut rows = self
            .conn
            .query(
                "SELECT domain, COUNT(*) AS pages FROM indexed_pages
                 GROUP BY domain ORDER BY pages DESC, domain ASC LIMIT ?",
                params![top_domains as i64],
            )
            .await
            .map_err(|e| DbError::Query(format!("Failed to count domains: {}", e)))?;

        let mut domains = Vec::new();
        while let Some(row) = rows.next().await? {
            domains.push(DomainCount {
                domain: row.get(0)?,
                count: row.get(1)?,
            });
        }

        Ok(CrawlStats {
            indexed_pages,
            queued_urls,
            queue,
            top_domains: domains,
        })
    }

    async fn count(&self, sql: &str) -> Result<i64, DbError> {
        let mut rows = self
            .conn
            .query(sql, params![])
            .await
            .map_err(|e| DbError::Query(format!("Failed to count rows: {}", e)))?;

        match rows.next().await? {
            Some(row) => Ok(row.get(0)?),
            None => Ok(0),
        }
    }

    fn row_to_entry(&self, row: &Row) -> Result<CrawlQueueEntry, DbError> {
        let status: String = row.get(2)?;
        let processed_at: Option<i64> = row.get(7)?;

        Ok(CrawlQueueEntry {
            id: row.get(0)?,
            url: row.get(1)?,
            status: status.parse()?,
            priority: row.get(3)?,
            retry_count: row.get(4)?,
            error_message: row.get(5)?,
            created_at: from_millis(row.get(6)?)?,
            processed_at: processed_at.map(from_millis).transpose()?,
        })
    }

    fn row_to_page(&self, row: &Row) -> Result<IndexedPage, DbError> {
        Ok(IndexedPage {
            url: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            content: row.get(3)?,
            domain: row.get(4)?,
            language: row.get(5)?,
            page_rank: row.get(6)?,
            last_crawled_at: from_millis(row.get(7)?)?,
        })
    }
}

/// `%query%` with the LIKE wildcards of `query` escaped
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use tempfile::tempdir;

    async fn setup_test_db() -> Result<(Database, tempfile::TempDir), DbError> {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();

        let db = Database::new_from_path(&db_path).await?;

        Ok((db, temp_dir))
    }

    fn page(url: &str, title: &str) -> IndexedPage {
        IndexedPage {
            url: url.to_string(),
            title: title.to_string(),
            description: String::new(),
            content: "Some content".to_string(),
            domain: "example.com".to_string(),
            language: "en".to_string(),
            page_rank: 3.0,
            last_crawled_at: Utc::now(),
        }
    }

    async fn count_rows(db: &Database, sql: &str, url: &str) -> i64 {
        let mut rows = db.execute_query(sql, params![url]).await.unwrap();
        rows.next().await.unwrap().unwrap().get(0).unwrap()
    }

    #[tokio::test]
    async fn test_database_initialization() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();

        let mut result = db
            .execute_query(
                "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('crawl_queue', 'indexed_pages')",
                params![],
            )
            .await
            .unwrap();

        let mut tables = Vec::new();
        while let Ok(Some(row)) = result.next().await {
            let table_name: String = row.get(0).unwrap();
            tables.push(table_name);
        }

        assert_eq!(tables.len(), 2);
        assert!(tables.contains(&"crawl_queue".to_string()));
        assert!(tables.contains(&"indexed_pages".to_string()));
    }

    #[tokio::test]
    async fn test_pending_selection_order() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let now = Utc::now();

        // A, B, C, D created in this order with priorities 3, 7, 7, 1
        for (url, priority) in [
            ("https://example.com/a", 3),
            ("https://example.com/b", 7),
            ("https://example.com/c", 7),
            ("https://example.com/d", 1),
        ] {
            db.enqueue_if_absent(url, priority, now).await.unwrap();
        }

        let urls: Vec<String> = db
            .pending_entries(10)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.url)
            .collect();

        assert_eq!(
            urls,
            vec![
                "https://example.com/b",
                "https://example.com/c",
                "https://example.com/a",
                "https://example.com/d",
            ]
        );
    }

    #[tokio::test]
    async fn test_older_entries_win_within_priority() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let now = Utc::now();

        db.enqueue_if_absent("https://example.com/new", 5, now)
            .await
            .unwrap();
        db.enqueue_if_absent("https://example.com/old", 5, now - Duration::hours(1))
            .await
            .unwrap();

        let entries = db.pending_entries(1).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://example.com/old");
    }

    #[tokio::test]
    async fn test_claim_is_exclusive() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let url = "https://example.com/claim";
        db.enqueue_if_absent(url, 5, Utc::now()).await.unwrap();

        assert!(db.claim_entry(url, Utc::now()).await.unwrap());
        assert!(!db.claim_entry(url, Utc::now()).await.unwrap());

        let entry = db.get_entry(url).await.unwrap().unwrap();
        assert_eq!(entry.status, QueueStatus::Processing);
        assert!(entry.processed_at.is_some());
        assert!(db.pending_entries(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fail_increments_retry_count_by_one() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let url = "https://example.com/flaky";
        db.enqueue_if_absent(url, 5, Utc::now()).await.unwrap();

        db.fail_entry(url, "HTTP 500: Internal Server Error", Utc::now())
            .await
            .unwrap();
        let entry = db.get_entry(url).await.unwrap().unwrap();
        assert_eq!(entry.status, QueueStatus::Failed);
        assert_eq!(entry.retry_count, 1);
        assert_eq!(
            entry.error_message.as_deref(),
            Some("HTTP 500: Internal Server Error")
        );

        db.fail_entry(url, "Timeout after 10s", Utc::now())
            .await
            .unwrap();
        let entry = db.get_entry(url).await.unwrap().unwrap();
        assert_eq!(entry.retry_count, 2);

        db.complete_entry(url, Utc::now()).await.unwrap();
        let entry = db.get_entry(url).await.unwrap().unwrap();
        assert_eq!(entry.status, QueueStatus::Completed);
        assert_eq!(entry.error_message, None);
        assert_eq!(entry.retry_count, 2);
    }

    #[tokio::test]
    async fn test_submission_updates_in_place() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let url = "https://example.com/submitted";

        let (entry, inserted) = db.submit_entry(url, 5, Utc::now()).await.unwrap();
        assert!(inserted);
        assert_eq!(entry.priority, 5);

        db.fail_entry(url, "HTTP 503: Service Unavailable", Utc::now())
            .await
            .unwrap();

        let (entry, inserted) = db.submit_entry(url, 9, Utc::now()).await.unwrap();
        assert!(!inserted);
        assert_eq!(entry.priority, 9);
        assert_eq!(entry.status, QueueStatus::Pending);

        assert!(!db.enqueue_if_absent(url, 3, Utc::now()).await.unwrap());
        assert_eq!(
            count_rows(&db, "SELECT COUNT(*) FROM crawl_queue WHERE url = ?", url).await,
            1
        );
    }

    #[tokio::test]
    async fn test_submission_keeps_running_claim() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let url = "https://example.com/busy";
        db.submit_entry(url, 5, Utc::now()).await.unwrap();
        assert!(db.claim_entry(url, Utc::now()).await.unwrap());

        let (entry, _) = db.submit_entry(url, 8, Utc::now()).await.unwrap();
        assert_eq!(entry.status, QueueStatus::Processing);
        assert_eq!(entry.priority, 8);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_page() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let url = "https://example.com/page";

        db.upsert_page(&page(url, "First title")).await.unwrap();
        db.upsert_page(&page(url, "Second title")).await.unwrap();

        let stored = db.get_page(url).await.unwrap().unwrap();
        assert_eq!(stored.title, "Second title");
        assert_eq!(
            count_rows(&db, "SELECT COUNT(*) FROM indexed_pages WHERE url = ?", url).await,
            1
        );
        assert!(db.get_page("https://example.com/none").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let now = Utc::now();

        db.enqueue_if_absent("https://example.com/1", 5, now).await.unwrap();
        db.enqueue_if_absent("https://example.com/2", 5, now).await.unwrap();
        db.enqueue_if_absent("https://example.com/3", 5, now).await.unwrap();
        db.fail_entry("https://example.com/3", "boom", now).await.unwrap();

        db.upsert_page(&page("https://example.com/1", "One")).await.unwrap();
        db.upsert_page(&page("https://example.com/2", "Two")).await.unwrap();
        let mut other = page("https://other.org/", "Other");
        other.domain = "other.org".to_string();
        db.upsert_page(&other).await.unwrap();

        let stats = db.stats(5).await.unwrap();
        assert_eq!(stats.indexed_pages, 3);
        assert_eq!(stats.queued_urls, 2);
        assert_eq!(
            stats.queue,
            vec![
                StatusCount {
                    status: QueueStatus::Failed,
                    count: 1
                },
                StatusCount {
                    status: QueueStatus::Pending,
                    count: 2
                },
            ]
        );
        assert_eq!(stats.top_domains[0].domain, "example.com");
        assert_eq!(stats.top_domains[0].count, 2);
        assert_eq!(stats.top_domains.len(), 2);
    }

    #[tokio::test]
    async fn test_search_orders_by_rank_then_recency() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let now = Utc::now();

        for (url, title, rank, age) in [
            ("https://example.com/low", "Rust basics", 1.5, 0),
            ("https://example.com/old", "Learning RUST", 7.0, 60),
            ("https://example.com/new", "rust in production", 7.0, 0),
            ("https://example.com/none", "Gardening", 9.0, 0),
        ] {
            let mut stored = page(url, title);
            stored.page_rank = rank;
            stored.last_crawled_at = now - Duration::seconds(age);
            db.upsert_page(&stored).await.unwrap();
        }

        let results = db.search_pages("rust", 10, 0).await.unwrap();

        assert_eq!(results.total, 3);
        let urls: Vec<&str> = results.hits.iter().map(|h| h.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/new",
                "https://example.com/old",
                "https://example.com/low"
            ]
        );
    }

    #[tokio::test]
    async fn test_search_matches_description_and_content() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();

        let mut described = page("https://example.com/d", "One");
        described.description = "All about Ferris".to_string();
        db.upsert_page(&described).await.unwrap();
        let mut body = page("https://example.com/c", "Two");
        body.content = "ferris the crab".to_string();
        db.upsert_page(&body).await.unwrap();
        db.upsert_page(&page("https://example.com/x", "Three")).await.unwrap();

        let results = db.search_pages("FERRIS", 10, 0).await.unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.hits.len(), 2);
    }

    #[tokio::test]
    async fn test_search_pagination() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        for i in 0..5 {
            let mut stored = page(&format!("https://example.com/{i}"), "Paged result");
            stored.page_rank = i as f64;
            db.upsert_page(&stored).await.unwrap();
        }

        let first = db.search_pages("paged", 2, 0).await.unwrap();
        let last = db.search_pages("paged", 2, 4).await.unwrap();
        let beyond = db.search_pages("paged", 2, 10).await.unwrap();

        assert_eq!(first.total, 5);
        assert_eq!(first.hits[0].url, "https://example.com/4");
        assert_eq!(first.hits[1].url, "https://example.com/3");
        assert_eq!(last.hits.len(), 1);
        assert_eq!(last.hits[0].url, "https://example.com/0");
        assert!(beyond.hits.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        db.upsert_page(&page("https://example.com/a", "100% coverage")).await.unwrap();
        db.upsert_page(&page("https://example.com/b", "1000 coverage")).await.unwrap();

        let results = db.search_pages("100%", 10, 0).await.unwrap();
        assert_eq!(results.total, 1);
        assert_eq!(results.hits[0].url, "https://example.com/a");

        let results = db.search_pages("_", 10, 0).await.unwrap();
        assert_eq!(results.total, 0);
    }

    #[tokio::test]
    async fn test_suggest_titles() {
        let (db, _temp_dir) = setup_test_db().await.unwrap();
        let mut best = page("https://example.com/1", "Tokio tutorial");
        best.page_rank = 9.0;
        db.upsert_page(&best).await.unwrap();
        db.upsert_page(&page("https://example.com/2", "tokio internals")).await.unwrap();
        db.upsert_page(&page("https://example.com/3", "")).await.unwrap();
        db.upsert_page(&page("https://example.com/4", "Async std")).await.unwrap();

        let titles = db.suggest_titles("tok", 8).await.unwrap();
        assert_eq!(titles, vec!["Tokio tutorial", "tokio internals"]);

        let titles = db.suggest_titles("tok", 1).await.unwrap();
        assert_eq!(titles, vec!["Tokio tutorial"]);
    }
}
