//! End-to-end tests for the crawl and query API
//!
//! These tests drive the axum router directly with tower's oneshot, use
//! wiremock servers as crawl targets, and give every test its own temporary
//! SQLite database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use linkmap::config::Config;
use linkmap::server::{create_router, AppState};
use linkmap::storage::{CrawlStore, SqliteStore};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    router: Router,
    db_path: std::path::PathBuf,
    _dir: TempDir,
}

fn test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");

    let mut config = Config::default();
    config.storage.database_path = db_path.to_string_lossy().into_owned();

    let state = AppState::new(&config).expect("failed to build app state");

    TestApp {
        router: create_router(state),
        db_path,
        _dir: dir,
    }
}

impl TestApp {
    async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let json = serde_json::from_slice(&body).expect("response body should be JSON");
        (status, json)
    }

    /// Opens a second connection to the test database for direct assertions
    fn open_store(&self) -> SqliteStore {
        SqliteStore::new(&self.db_path).expect("failed to reopen test database")
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_usage_page() {
    let app = test_app();

    let (status, body) = app.get("/").await;
    let text = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("/crawl/"));
    assert!(text.contains("/search/"));
    assert!(text.contains("/reset/"));
}

#[tokio::test]
async fn test_crawl_depth_one_collects_links() {
    let server = MockServer::start().await;
    // One real link plus an anchor with empty visible text
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/about">About</a><a href="/x"> </a>"#,
        ))
        .mount(&server)
        .await;

    let app = test_app();
    let seed = format!("{}/", server.uri());
    let (status, json) = app
        .get_json(&format!("/crawl/?url={}&depth=1", seed))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["url"], seed.as_str());
    assert_eq!(json["depth"], 1);

    let links = json["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["title"], "About");
    assert_eq!(links[0]["url"], format!("{}/about", server.uri()));
    // Depth 1 attaches no children
    assert!(links[0].get("children").is_none());

    // Exactly one page row and one link row persisted
    let store = app.open_store();
    assert_eq!(store.count_pages().unwrap(), 1);
    assert_eq!(store.count_links().unwrap(), 1);

    let pages = store.search_pages(None).unwrap();
    assert_eq!(pages[0].url, seed);
    assert!(pages[0].is_crawled);
}

#[tokio::test]
async fn test_crawl_default_depth_is_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/next">Next</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app();
    let (status, json) = app
        .get_json(&format!("/crawl/?url={}/", server.uri()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["depth"], 1);
    assert_eq!(json["links"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_crawl_depth_limit_enforced() {
    let server = MockServer::start().await;
    // Nothing may be fetched when validation fails
    Mock::given(method("GET"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app();
    let (status, json) = app
        .get_json(&format!("/crawl/?url={}/&depth=4", server.uri()))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json["detail"],
        "Depth is too large. Maximum allowed depth is 3."
    );

    // And nothing was written
    let store = app.open_store();
    assert_eq!(store.count_pages().unwrap(), 0);
    assert_eq!(store.count_links().unwrap(), 0);
}

#[tokio::test]
async fn test_crawl_depth_three_is_allowed() {
    let server = MockServer::start().await;
    // Chain: / -> /a -> /b -> /c; depth 3 stops before fetching /c
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/a">A</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(r#"<a href="/b">B</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page(r#"<a href="/c">C</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app();
    let (status, json) = app
        .get_json(&format!("/crawl/?url={}/&depth=3", server.uri()))
        .await;

    assert_eq!(status, StatusCode::OK);

    let a = &json["links"][0];
    assert_eq!(a["title"], "A");
    let b = &a["children"][0];
    assert_eq!(b["title"], "B");
    let c = &b["children"][0];
    assert_eq!(c["title"], "C");
    // The counter ran out: the deepest link was recorded but not followed
    assert!(c.get("children").is_none());

    // Three pages fetched and persisted: /, /a, /b
    let store = app.open_store();
    assert_eq!(store.count_pages().unwrap(), 3);
}

#[tokio::test]
async fn test_crawl_fetch_failure_yields_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = test_app();
    let seed = format!("{}/", server.uri());
    let (status, json) = app
        .get_json(&format!("/crawl/?url={}&depth=2", seed))
        .await;

    // Failure is silent and partial, not an error response
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["url"], seed.as_str());
    assert_eq!(json["depth"], 2);
    assert_eq!(json["links"].as_array().unwrap().len(), 0);

    // No page row for the unreachable seed
    let store = app.open_store();
    assert_eq!(store.count_pages().unwrap(), 0);
}

#[tokio::test]
async fn test_crawl_unparsable_url_yields_empty_result() {
    let app = test_app();
    let (status, json) = app.get_json("/crawl/?url=not-a-url&depth=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["links"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_recrawl_keeps_one_page_row_and_appends_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/about">About</a>"#))
        .mount(&server)
        .await;

    let app = test_app();
    let uri = format!("/crawl/?url={}/&depth=1", server.uri());

    let (status, _) = app.get_json(&uri).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get_json(&uri).await;
    assert_eq!(status, StatusCode::OK);

    let store = app.open_store();
    // The page row is deduplicated, the link batches are append-only
    assert_eq!(store.count_pages().unwrap(), 1);
    assert_eq!(store.count_links().unwrap(), 2);
}

#[tokio::test]
async fn test_search_filters_by_substring() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/books">Books</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(html_page(""))
        .mount(&server)
        .await;

    let app = test_app();
    app.get_json(&format!("/crawl/?url={}/&depth=2", server.uri()))
        .await;

    // Both the seed and /books were visited
    let (status, json) = app.get_json("/search/").await;
    assert_eq!(status, StatusCode::OK);
    let all = json.as_array().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0]["is_crawled"].as_bool().unwrap());

    let (status, json) = app.get_json("/search/?query=books").await;
    assert_eq!(status, StatusCode::OK);
    let hits = json.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0]["url"].as_str().unwrap().ends_with("/books"));

    let (_, json) = app.get_json("/search/?query=nomatch").await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_reset_clears_all_crawl_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/about">About</a>"#))
        .mount(&server)
        .await;

    let app = test_app();
    app.get_json(&format!("/crawl/?url={}/&depth=1", server.uri()))
        .await;

    let (status, json) = app.get_json("/reset/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], "Crawling data reset successfully");

    // Search finds nothing, and no orphaned link rows survive
    let (_, json) = app.get_json("/search/").await;
    assert_eq!(json.as_array().unwrap().len(), 0);

    let store = app.open_store();
    assert_eq!(store.count_pages().unwrap(), 0);
    assert_eq!(store.count_links().unwrap(), 0);
}

#[tokio::test]
async fn test_reset_on_empty_database() {
    let app = test_app();

    let (status, json) = app.get_json("/reset/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "success");
}
