//! # Database Schema Module
//!
//! Creates the two tables behind the crawler:
//! 1. `crawl_queue` - the persisted frontier, one row per URL
//! 2. `indexed_pages` - the extracted form of every successfully crawled URL
//!
//! Both tables key on a unique `url`, which is what makes discovery inserts
//! and page upserts idempotent. Frontier order is decided at selection time
//! by `priority`, `created_at` and the row id, so the pending index covers
//! exactly those columns. Search results are ordered by rank, so pages are
//! indexed on `page_rank` and recency.

use crate::index::error::DbError;
use libsql::{Connection, params};

/// Initialize the database schema
pub async fn initialize_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS crawl_queue (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'processing', 'completed', 'failed')),
            priority INTEGER NOT NULL DEFAULT 3,
            retry_count INTEGER NOT NULL DEFAULT 0,
            error_message TEXT,
            created_at INTEGER NOT NULL,
            processed_at INTEGER
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create crawl_queue table: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_crawl_queue_pending
         ON crawl_queue(status, priority DESC, created_at ASC, id ASC)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create index on crawl_queue: {}", e)))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS indexed_pages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            content TEXT NOT NULL,
            domain TEXT NOT NULL,
            language TEXT NOT NULL,
            page_rank REAL NOT NULL,
            last_crawled_at INTEGER NOT NULL
        )",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create indexed_pages table: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_indexed_pages_domain ON indexed_pages(domain)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create index on indexed_pages: {}", e)))?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_indexed_pages_rank
         ON indexed_pages(page_rank DESC, last_crawled_at DESC)",
        params![],
    )
    .await
    .map_err(|e| DbError::Schema(format!("Failed to create rank index on indexed_pages: {}", e)))?;

    Ok(())
}
