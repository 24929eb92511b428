//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the fetch engine and the full crawl cycle end-to-end.

use seedcrawl::config::{parse_config, Config};
use seedcrawl::crawler::{run_crawl, Fetcher, HttpEngine};
use seedcrawl::storage::{open_storage, Storage};
use seedcrawl::task::{TaskConf, UrlTask};
use seedcrawl::FetchError;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Host and port of the mock server, as used in a seed line
fn server_domain(server: &MockServer) -> String {
    server.address().to_string()
}

/// Writes a seed file and a config pointing at it
fn create_test_config(dir: &TempDir, mode: &str, max_depth: u32, seed_lines: &[String]) -> Config {
    let seed_path = dir.path().join("seeds.conf");
    std::fs::write(&seed_path, seed_lines.join("\n")).expect("Failed to write seed file");
    let db_path = dir.path().join("crawler.db");

    parse_config(&format!(
        r#"
[crawler]
mode = "{}"
max-depth = {}
seed-file = '{}'

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"

[output]
database-path = '{}'
"#,
        mode,
        max_depth,
        seed_path.display(),
        db_path.display()
    ))
    .expect("Failed to parse test config")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

fn seed_task(server: &MockServer) -> UrlTask {
    UrlTask::seed(TaskConf::new(&server_domain(server)).expect("Valid seed domain"))
}

fn engine() -> HttpEngine {
    HttpEngine::new("TestBot/1.0", Duration::from_secs(3)).expect("Failed to build engine")
}

#[tokio::test]
async fn test_engine_records_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("hello").insert_header("ETag", "\"abc\""))
        .mount(&mock_server)
        .await;

    let mut engine = engine();
    let response = engine.fetch(&seed_task(&mock_server)).await;

    assert_eq!(response.status_code, Some(200));
    assert!(response.exceptions.is_empty());
    assert_eq!(
        response.body.as_deref(),
        Some(&b"<html><body>hello</body></html>"[..])
    );
    assert_eq!(response.headers.get("etag"), Some("\"abc\""));
    assert!(response
        .headers
        .get("Content-Type")
        .is_some_and(|value| value.starts_with("text/html")));
    assert_eq!(engine.status_code(), Some(200));
    assert_eq!(engine.header("ETAG"), Some("\"abc\""));
}

#[tokio::test]
async fn test_engine_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(html(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = engine().fetch(&seed_task(&mock_server)).await;
    assert_eq!(response.status_code, Some(200));
}

#[tokio::test]
async fn test_engine_records_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let task = seed_task(&mock_server);
    let response = engine().fetch(&task).await;

    assert_eq!(response.status_code, Some(404));
    assert!(response.body.is_none());
    assert_eq!(
        response.exceptions,
        vec![FetchError::Status {
            url: task.url.clone(),
            status: 404
        }]
    );
}

#[tokio::test]
async fn test_engine_does_not_follow_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", "http://127.0.0.1:1/elsewhere"),
        )
        .mount(&mock_server)
        .await;

    let response = engine().fetch(&seed_task(&mock_server)).await;

    assert_eq!(response.status_code, Some(301));
    assert_eq!(
        response.headers.get("location"),
        Some("http://127.0.0.1:1/elsewhere")
    );
}

#[tokio::test]
async fn test_engine_socket_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("slow").set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let mut task = seed_task(&mock_server);
    task.conf.socket_timeout_ms = 200;
    let response = engine().fetch(&task).await;

    assert_eq!(response.status_code, None);
    assert!(response.body.is_none());
    assert!(matches!(
        response.exceptions.as_slice(),
        [FetchError::Transport { .. }]
    ));
}

#[tokio::test]
async fn test_full_crawl_storage_mode() {
    let mock_server = MockServer::start().await;
    let domain = server_domain(&mock_server);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/page1">Page 1</a>
               <a href="page2">Page 2</a>
               <a href="/archive.zip">Archive</a>
               <a href="http://other.invalid/x">Elsewhere</a>
               <a href="/missing">Missing</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(r#"<a href="/page3">Page 3</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html("leaf"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Beyond max depth
    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(html("too deep"))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/archive.zip"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed_line = format!("{}, -1, 0, 1, false, 1000, 5000", domain);
    let config = create_test_config(&dir, "storage", 0, &[seed_line]);
    let db_path = config.output.database_path.clone();

    let reports = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].crawler, "crawler-0");
    let summary = reports[0].summary;
    assert_eq!(summary.pages_fetched, 4);
    assert_eq!(summary.pages_succeeded, 3);
    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.max_depth_reached, 1);

    let storage = open_storage(Path::new(&db_path)).expect("Failed to open database");
    let base = format!("http://{}", domain);

    let root = storage.query_page(&base).unwrap().expect("Root page stored");
    assert_eq!(root.status_code, Some(200));
    assert_eq!(root.charset.as_deref(), Some("utf-8"));
    assert!(root.content.is_some());

    let page2 = storage
        .query_page(&format!("{}/page2", base))
        .unwrap()
        .expect("Relative link resolved and stored");
    assert_eq!(page2.status_code, Some(200));

    let missing = storage
        .query_page(&format!("{}/missing", base))
        .unwrap()
        .expect("Failed page stored");
    assert_eq!(missing.status_code, Some(404));
    assert!(missing.content.is_none());

    assert_eq!(storage.query_all_urls().unwrap().len(), 4);
    assert!(storage.query_page(&format!("{}/page3", base)).unwrap().is_none());
}

#[tokio::test]
async fn test_second_run_skips_stored_pages() {
    let mock_server = MockServer::start().await;
    let domain = server_domain(&mock_server);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/gone">Gone</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed_line = format!("{}, , , 1, , , ", domain);

    let first = run_crawl(create_test_config(&dir, "storage", 0, &[seed_line.clone()]))
        .await
        .expect("First crawl failed");
    assert_eq!(first[0].summary.pages_fetched, 2);

    let second = run_crawl(create_test_config(&dir, "storage", 0, &[seed_line]))
        .await
        .expect("Second crawl failed");
    assert_eq!(second[0].summary.pages_fetched, 0);
}

#[tokio::test]
async fn test_simple_mode_crawls_without_storage() {
    let mock_server = MockServer::start().await;
    let domain = server_domain(&mock_server);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/a">A</a><a href="/b">B</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/">Home</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(""))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    // Seed leaves maxDepth empty so the run default (1) applies
    let config = create_test_config(&dir, "simple", 1, &[format!("{},,,,,,", domain)]);
    let db_path = config.output.database_path.clone();

    let reports = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(reports[0].summary.pages_fetched, 3);
    assert_eq!(reports[0].summary.pages_succeeded, 3);
    assert!(!Path::new(&db_path).exists());
}

#[tokio::test]
async fn test_url_limit_caps_fetches() {
    let mock_server = MockServer::start().await;
    let domain = server_domain(&mock_server);

    let links: String = (0..5)
        .map(|i| format!(r#"<a href="/p{}">P</a>"#, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&links))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(html(""))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let seed_line = format!("{}, 3, 0, 1, false, , ", domain);
    let config = create_test_config(&dir, "simple", 0, &[seed_line]);

    let reports = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(reports[0].summary.pages_fetched, 3);
    assert_eq!(reports[0].summary.skipped_by_limit, 3);
    assert_eq!(mock_server.received_requests().await.map(|r| r.len()), Some(3));
}

#[tokio::test]
async fn test_missing_seed_file_fails_run() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = create_test_config(&dir, "simple", 0, &[]);
    config.crawler.seed_file = dir.path().join("absent.conf").display().to_string();

    assert!(run_crawl(config).await.is_err());
}
