//! Storage module for persisting crawl data
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Visited-page persistence with URL-keyed deduplication
//! - Per-page link batches
//! - Substring search and full reset

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStore;
pub use traits::{CrawlStore, StorageError, StorageResult};

use crate::LinkmapError;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized storage
/// * `Err(LinkmapError)` - Failed to initialize storage
pub fn open_store(path: &Path) -> Result<SqliteStore, LinkmapError> {
    SqliteStore::new(path)
}

/// A visited page in the database
///
/// There is at most one row per distinct absolute URL; the store enforces
/// this, not the caller.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: i64,
    pub url: String,
    pub is_crawled: bool,
    pub discovered_at: String,
}

/// A link discovered on a visited page
///
/// Many links belong to one page. Link rows are append-only: re-crawling a
/// page inserts a fresh batch rather than deduplicating against earlier
/// crawls.
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub page_id: i64,
    pub discovered_at: String,
}
