//! Storage traits and error types
//!
//! This module defines the trait interface for crawl store backends and
//! associated error types.

use crate::storage::{LinkRecord, PageRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl store backends
///
/// The store owns deduplication of visited pages: callers may race on the
/// same URL and still observe at most one inserted row.
pub trait CrawlStore {
    /// Atomic lookup-or-insert keyed by exact URL string match
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL of the page
    /// * `is_crawled` - Crawled flag recorded when the row is created
    ///
    /// # Returns
    ///
    /// The page record plus whether this call created it. A row that already
    /// exists is returned unchanged; the crawled flag is only set at
    /// creation time.
    fn find_or_create_page(
        &mut self,
        url: &str,
        is_crawled: bool,
    ) -> StorageResult<(PageRecord, bool)>;

    /// Batch-inserts link rows owned by a page
    ///
    /// All-or-nothing: if any insert fails, the whole batch is rolled back.
    /// Link rows are append-only; repeated crawls of the same page add a
    /// fresh batch.
    fn add_links(&mut self, page_id: i64, links: &[(String, String)]) -> StorageResult<()>;

    /// Lists visited pages, optionally filtered by URL substring
    ///
    /// A `None` query returns the full listing. Results are ordered by id.
    fn search_pages(&self, query: Option<&str>) -> StorageResult<Vec<PageRecord>>;

    /// Gets all link rows owned by a page, ordered by id
    fn links_for_page(&self, page_id: i64) -> StorageResult<Vec<LinkRecord>>;

    /// Counts all visited pages
    fn count_pages(&self) -> StorageResult<u64>;

    /// Counts all link rows
    fn count_links(&self) -> StorageResult<u64>;

    /// Deletes all link rows, then all page rows, as one transaction
    ///
    /// After a reset no record of either kind survives; the ordering means
    /// no orphaned link can remain even without the schema-level cascade.
    fn reset(&mut self) -> StorageResult<()>;
}
