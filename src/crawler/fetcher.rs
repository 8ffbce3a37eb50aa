//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests to fetch page content
//! - Error classification
//!
//! Fetch failures are values, never panics or errors propagated across the
//! engine boundary: a failed branch must not take its siblings down.

use crate::config::CrawlerConfig;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched the page body
    Html {
        /// Page body content
        body: String,
    },

    /// The server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, DNS failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Short human-readable description of a failure, for diagnostics
    pub fn describe(&self) -> String {
        match self {
            FetchOutcome::Html { .. } => "success".to_string(),
            FetchOutcome::HttpError { status_code } => format!("HTTP status {}", status_code),
            FetchOutcome::NetworkError { error } => error.clone(),
        }
    }
}

/// Builds an HTTP client with the configured user agent and timeouts
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the outcome as a value
///
/// Any non-2xx status and any transport error (timeout, DNS, connection
/// refused) is reported as a failure outcome carrying the underlying cause.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            if !status.is_success() {
                return FetchOutcome::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchOutcome::Html { body },
                Err(e) => FetchOutcome::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                "connection failed".to_string()
            } else {
                e.to_string()
            };
            FetchOutcome::NetworkError { error }
        }
    }
}
