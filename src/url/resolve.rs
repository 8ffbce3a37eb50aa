use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a possibly-relative `href` against `base` into an absolute URL
/// string
///
/// Resolution follows the standard URL-resolution rules: relative paths,
/// scheme-relative references, fragments, and query strings are all handled
/// by [`Url::join`]. This function never fails; input the resolver cannot
/// make sense of is passed through as an opaque string.
///
/// # Arguments
///
/// * `base` - The absolute URL to resolve against
/// * `href` - The reference to resolve (absolute or relative)
///
/// # Examples
///
/// ```
/// use linkmap::url::absolute_url;
///
/// assert_eq!(
///     absolute_url("http://example.com", "/about"),
///     "http://example.com/about"
/// );
/// assert_eq!(
///     absolute_url("http://example.com", "https://other.com/x"),
///     "https://other.com/x"
/// );
/// ```
pub fn absolute_url(base: &str, href: &str) -> String {
    match Url::parse(base) {
        Ok(base_url) => match base_url.join(href) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => href.to_string(),
        },
        // No usable base: an absolute href still resolves on its own,
        // anything else passes through untouched.
        Err(_) => match Url::parse(href) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => href.to_string(),
        },
    }
}

/// Returns the `scheme://host[:port]` origin of an absolute URL
///
/// The origin is computed once per crawl invocation and fixed for the whole
/// traversal; every href found during that crawl is resolved against it.
/// Non-default ports are preserved.
///
/// # Arguments
///
/// * `url` - An absolute URL
///
/// # Returns
///
/// * `Ok(String)` - The origin
/// * `Err(UrlError)` - The URL could not be parsed or has no host
///
/// # Examples
///
/// ```
/// use linkmap::url::origin_of;
///
/// let origin = origin_of("http://example.com/deep/page?q=1").unwrap();
/// assert_eq!(origin, "http://example.com");
/// ```
pub fn origin_of(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let origin = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    };

    Ok(origin)
}
