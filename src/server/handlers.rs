//! Request handlers for the crawl, search, and reset endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::crawler::CrawledLink;
use crate::storage::CrawlStore;
use crate::url::origin_of;

use super::AppState;

/// Handler-level errors, serialized as `{"detail": ...}`
pub enum ApiError {
    /// Client error: invalid request parameters
    BadRequest(String),

    /// Server error: the store is unavailable or a query failed
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

/// Query params for GET /crawl/?url=...&depth=...
#[derive(Deserialize)]
pub struct CrawlParams {
    pub url: String,

    /// Depth 1 means "crawl only the given URL"
    #[serde(default = "default_depth")]
    pub depth: i64,
}

fn default_depth() -> i64 {
    1
}

/// Response body for GET /crawl/
#[derive(Serialize)]
pub struct CrawlResponse {
    pub url: String,
    pub depth: i64,
    pub links: Vec<CrawledLink>,
}

/// Query params for GET /search/?query=...
#[derive(Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// One visited page in the search listing
#[derive(Serialize)]
pub struct PageSummary {
    pub id: i64,
    pub url: String,
    pub is_crawled: bool,
}

/// Response body for GET /reset/
#[derive(Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// GET / -> plain-text usage summary
pub async fn usage() -> &'static str {
    "\
200: OK
Paths:
/crawl/
    url=http://example.com
    depth=2
/search/
    query=query
/reset/
Examples:
/crawl/?url=http://example.com&depth=2
/search/?query=books
"
}

/// GET /crawl/?url=<seed>&depth=<hops>
///
/// Rejects depths above the configured maximum before any fetch or write
/// happens. Crawl failures below the seed are silent and partial: the
/// affected branches come back empty rather than failing the request.
pub async fn crawl(
    State(state): State<AppState>,
    Query(params): Query<CrawlParams>,
) -> Result<Json<CrawlResponse>, ApiError> {
    if params.depth > state.max_depth {
        return Err(ApiError::BadRequest(format!(
            "Depth is too large. Maximum allowed depth is {}.",
            state.max_depth
        )));
    }

    // The origin anchors the whole traversal; an unparsable seed leaves it
    // empty and the crawl comes back empty the same way a dead host would.
    let origin = match origin_of(&params.url) {
        Ok(origin) => origin,
        Err(e) => {
            tracing::debug!("No origin for {}: {}", params.url, e);
            String::new()
        }
    };

    let links = state.engine.crawl(&origin, &params.url, params.depth).await;

    Ok(Json(CrawlResponse {
        url: params.url,
        depth: params.depth,
        links,
    }))
}

/// GET /search/?query=<substring> -> pages whose URL contains the substring;
/// the full listing when no query is given
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PageSummary>>, ApiError> {
    let store = state
        .store
        .lock()
        .map_err(|_| ApiError::Internal("store lock poisoned".to_string()))?;

    let pages = store
        .search_pages(params.query.as_deref())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let summaries = pages
        .into_iter()
        .map(|page| PageSummary {
            id: page.id,
            url: page.url,
            is_crawled: page.is_crawled,
        })
        .collect();

    Ok(Json(summaries))
}

/// GET /reset/ -> deletes all pages and links
pub async fn reset(State(state): State<AppState>) -> Result<Json<ResetResponse>, ApiError> {
    let mut store = state
        .store
        .lock()
        .map_err(|_| ApiError::Internal("store lock poisoned".to_string()))?;

    store
        .reset()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(ResetResponse {
        status: "success",
        message: "Crawling data reset successfully",
    }))
}
