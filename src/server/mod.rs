//! HTTP surface for the crawl and query services
//!
//! Exposes four routes over the crawl store:
//! - `GET /` — plain-text usage summary
//! - `GET /crawl/` — run a depth-bounded crawl from a seed URL
//! - `GET /search/` — substring search over visited pages
//! - `GET /reset/` — delete all persisted crawl data

mod handlers;
mod routes;

pub use routes::create_router;

use crate::config::Config;
use crate::crawler::{build_http_client, CrawlEngine};
use crate::storage::{open_store, SqliteStore};
use crate::LinkmapError;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Shared state for the web server
///
/// The store handle is shared between the crawl engine and the query
/// handlers; lock scopes stay short and never span a fetch.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CrawlEngine>,
    pub store: Arc<Mutex<SqliteStore>>,
    pub max_depth: i64,
}

impl AppState {
    /// Builds the shared state from configuration: opens the database and
    /// constructs the HTTP client and crawl engine.
    pub fn new(config: &Config) -> Result<Self, LinkmapError> {
        let store = open_store(Path::new(&config.storage.database_path))?;
        let store = Arc::new(Mutex::new(store));

        let client = build_http_client(&config.crawler)?;
        let engine = Arc::new(CrawlEngine::new(client, Arc::clone(&store)));

        Ok(Self {
            engine,
            store,
            max_depth: i64::from(config.crawler.max_depth),
        })
    }
}

/// Starts the web server
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = AppState::new(config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
