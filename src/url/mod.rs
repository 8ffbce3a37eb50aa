//! URL handling for the crawler
//!
//! This module converts the possibly-relative hrefs found in pages into
//! canonical absolute URLs, and extracts the origin that anchors one crawl
//! traversal.

mod resolve;

pub use resolve::{absolute_url, origin_of};
