//! HTML link extraction
//!
//! This module parses HTML content into the (title, href) pairs the crawl
//! engine works with. Hrefs are returned raw; resolution against the crawl
//! origin happens in the engine.

use scraper::{Html, Selector};

/// A link extracted from an anchor element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    /// The anchor's trimmed visible text
    pub title: String,

    /// The raw href attribute, not yet resolved
    pub href: String,
}

/// Extracts links from HTML content
///
/// # Extraction Rules
///
/// **Include:** `<a>` elements carrying a non-empty `href`, in document
/// order, duplicates included (the store filters later).
///
/// **Exclude:** anchors whose trimmed visible text is empty.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
///
/// # Returns
///
/// The (title, href) pairs found, in document order
///
/// # Example
///
/// ```
/// use linkmap::crawler::extract_links;
///
/// let html = r#"<a href="/about">About</a><a href="/x"> </a>"#;
/// let links = extract_links(html);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].title, "About");
/// assert_eq!(links[0].href, "/about");
/// ```
pub fn extract_links(html: &str) -> Vec<ExtractedLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let href = match element.value().attr("href") {
                Some(href) if !href.is_empty() => href,
                _ => continue,
            };

            let title = element.text().collect::<String>().trim().to_string();
            if title.is_empty() {
                continue;
            }

            links.push(ExtractedLink {
                title,
                href: href.to_string(),
            });
        }
    }

    links
}
