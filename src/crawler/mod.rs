//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with failure-as-value reporting
//! - HTML link extraction
//! - The depth-bounded recursive crawl engine

mod engine;
mod fetcher;
mod parser;

pub use engine::{CrawlEngine, CrawledLink};
pub use fetcher::{build_http_client, fetch_url, FetchOutcome};
pub use parser::{extract_links, ExtractedLink};
