//! Depth-bounded crawl engine
//!
//! This module contains the recursive traversal at the heart of the crate:
//! fetch a page, extract its links, persist the visit, then follow each link
//! with one less hop remaining.

use crate::crawler::fetcher::{fetch_url, FetchOutcome};
use crate::crawler::parser::extract_links;
use crate::storage::{CrawlStore, SqliteStore};
use crate::url::absolute_url;
use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// A link found while crawling, with the sub-links found by following it
#[derive(Debug, Clone, Serialize)]
pub struct CrawledLink {
    /// The anchor's visible text
    pub title: String,

    /// The link target, resolved to absolute form against the crawl origin
    pub url: String,

    /// Links found by following this link; absent at the depth limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CrawledLink>>,
}

/// Depth-bounded recursive crawler
///
/// The engine holds the HTTP client and a handle to the crawl store; one
/// engine serves every crawl invocation.
pub struct CrawlEngine {
    client: Client,
    store: Arc<Mutex<SqliteStore>>,
}

impl CrawlEngine {
    /// Creates a new engine over the given client and store
    pub fn new(client: Client, store: Arc<Mutex<SqliteStore>>) -> Self {
        Self { client, store }
    }

    /// Crawls `url` and, transitively, the links found on it
    ///
    /// `origin` is the `scheme://host[:port]` anchor for the whole
    /// traversal, computed once from the seed; every href is resolved
    /// against it rather than against the page it was found on. `depth` is
    /// the number of link-following hops remaining: below 1 the call
    /// returns an empty list, at exactly 1 only this page is fetched and
    /// its links returned without children.
    ///
    /// The depth counter is the sole recursion guard. It is decremented on
    /// every hop and never reconstructed from the URL graph, so cycles in
    /// the graph cannot recurse unboundedly. The engine places no upper
    /// bound on `depth` itself; callers must, because total work grows
    /// exponentially with the branching factor.
    ///
    /// # Failure handling
    ///
    /// A fetch failure or a page-insert failure makes this branch yield an
    /// empty list; siblings and ancestors continue. A failed link batch is
    /// logged and skipped, the branch still recurses and returns its links.
    pub fn crawl<'a>(
        &'a self,
        origin: &'a str,
        url: &'a str,
        depth: i64,
    ) -> Pin<Box<dyn Future<Output = Vec<CrawledLink>> + Send + 'a>> {
        Box::pin(async move {
            if depth < 1 {
                return Vec::new();
            }

            let page_url = absolute_url(origin, url);

            let body = match fetch_url(&self.client, &page_url).await {
                FetchOutcome::Html { body } => body,
                failure => {
                    tracing::warn!("Fetch failed for {}: {}", page_url, failure.describe());
                    return Vec::new();
                }
            };

            let extracted = extract_links(&body);
            tracing::debug!(
                "Crawled {} at depth {}: {} links",
                page_url,
                depth,
                extracted.len()
            );

            // The page row must exist before its link rows reference it.
            let page_id = {
                let mut store = self.store.lock().unwrap();
                match store.find_or_create_page(&page_url, true) {
                    Ok((page, _created)) => page.id,
                    Err(e) => {
                        tracing::warn!("Failed to record page {}: {}", page_url, e);
                        return Vec::new();
                    }
                }
            };

            let mut links: Vec<CrawledLink> = extracted
                .iter()
                .map(|link| CrawledLink {
                    title: link.title.clone(),
                    url: absolute_url(origin, &link.href),
                    children: None,
                })
                .collect();

            let rows: Vec<(String, String)> = links
                .iter()
                .map(|link| (link.title.clone(), link.url.clone()))
                .collect();
            {
                let mut store = self.store.lock().unwrap();
                if let Err(e) = store.add_links(page_id, &rows) {
                    tracing::warn!("Failed to record links for {}: {}", page_url, e);
                }
            }

            if depth > 1 {
                // Recurse on the raw href; it resolves against the fixed
                // origin at the next level.
                for (link, raw) in links.iter_mut().zip(&extracted) {
                    let children = self.crawl(origin, &raw.href, depth - 1).await;
                    link.children = Some(children);
                }
            }

            links
        })
    }
}
