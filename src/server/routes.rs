//! Router configuration for the web server.

use axum::{routing::get, Router};

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::usage))
        .route("/crawl/", get(handlers::crawl))
        .route("/search/", get(handlers::search))
        .route("/reset/", get(handlers::reset))
        .with_state(state)
}
