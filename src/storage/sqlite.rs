//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the CrawlStore
//! trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CrawlStore, StorageError, StorageResult};
use crate::storage::{LinkRecord, PageRecord};
use crate::LinkmapError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(LinkmapError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, LinkmapError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, LinkmapError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn row_to_page(row: &Row<'_>) -> rusqlite::Result<PageRecord> {
        Ok(PageRecord {
            id: row.get(0)?,
            url: row.get(1)?,
            is_crawled: row.get(2)?,
            discovered_at: row.get(3)?,
        })
    }

    fn page_by_url(conn: &Connection, url: &str) -> StorageResult<Option<PageRecord>> {
        let page = conn
            .query_row(
                "SELECT id, url, is_crawled, discovered_at FROM pages WHERE url = ?1",
                params![url],
                Self::row_to_page,
            )
            .optional()?;
        Ok(page)
    }
}

impl CrawlStore for SqliteStore {
    fn find_or_create_page(
        &mut self,
        url: &str,
        is_crawled: bool,
    ) -> StorageResult<(PageRecord, bool)> {
        // The IMMEDIATE transaction plus the UNIQUE constraint on url give
        // at-most-one insert per URL across racing callers; a loser of the
        // race falls into the re-fetch below.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(page) = Self::page_by_url(&tx, url)? {
            tx.commit()?;
            return Ok((page, false));
        }

        let now = Utc::now().to_rfc3339();
        let inserted = tx.execute(
            "INSERT INTO pages (url, is_crawled, discovered_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(url) DO NOTHING",
            params![url, is_crawled, now],
        )?;

        let page = Self::page_by_url(&tx, url)?
            .ok_or_else(|| StorageError::PageNotFound(url.to_string()))?;
        tx.commit()?;

        Ok((page, inserted > 0))
    }

    fn add_links(&mut self, page_id: i64, links: &[(String, String)]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        {
            let now = Utc::now().to_rfc3339();
            let mut stmt = tx.prepare(
                "INSERT INTO links (title, url, page_id, discovered_at) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (title, url) in links {
                stmt.execute(params![title, url, page_id, now])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn search_pages(&self, query: Option<&str>) -> StorageResult<Vec<PageRecord>> {
        let pages = match query {
            Some(q) => {
                let pattern = format!("%{}%", q);
                let mut stmt = self.conn.prepare(
                    "SELECT id, url, is_crawled, discovered_at FROM pages
                     WHERE url LIKE ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![pattern], Self::row_to_page)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, url, is_crawled, discovered_at FROM pages ORDER BY id",
                )?;
                let rows = stmt.query_map([], Self::row_to_page)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(pages)
    }

    fn links_for_page(&self, page_id: i64) -> StorageResult<Vec<LinkRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, url, page_id, discovered_at FROM links
             WHERE page_id = ?1 ORDER BY id",
        )?;

        let links = stmt
            .query_map(params![page_id], |row| {
                Ok(LinkRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    url: row.get(2)?,
                    page_id: row.get(3)?,
                    discovered_at: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn count_pages(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_links(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn reset(&mut self) -> StorageResult<()> {
        // Links go first so the pages delete can never strand a child row,
        // independent of the schema-level cascade.
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM links", [])?;
        tx.execute("DELETE FROM pages", [])?;
        tx.commit()?;
        Ok(())
    }
}
