//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full site
//! crawls end-to-end through the reqwest-backed fetcher.

use chrono::Utc;
use fawnbot::analysis::CrawlAnalysis;
use fawnbot::config::{load_config_with_hash, CrawlerConfig, UserAgentConfig};
use fawnbot::crawler::{build_http_client, crawl_site, HttpFetcher, SiteCrawl};
use fawnbot::output::{ExportSink, MarkdownExport, SiteReport, SqliteExport};
use fawnbot::FawnError;
use reqwest::redirect::Policy;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_fetcher() -> Arc<HttpFetcher> {
    let user_agent = UserAgentConfig {
        crawler_name: "testbot".to_string(),
        crawler_version: "1.0".to_string(),
        contact_url: "https://example.com/bot".to_string(),
    };
    let client = build_http_client(&user_agent, &CrawlerConfig::default())
        .expect("Failed to build client");
    Arc::new(HttpFetcher::with_client(client))
}

/// Fetcher that gives up quickly, for slow-response tests
fn impatient_fetcher() -> Arc<HttpFetcher> {
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .timeout(Duration::from_millis(200))
        .build()
        .expect("Failed to build client");
    Arc::new(HttpFetcher::with_client(client))
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.to_string())
        .insert_header("content-type", "text/html")
}

async fn mount_get(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    mount_get(
        &server,
        "/",
        html(
            r#"<html><head><title>Home</title>
            <meta name="description" content="Welcome">
            </head><body>
            <a href="/about">About</a>
            <a href="/blog">Blog</a>
            <a href="https://elsewhere.example/">Elsewhere</a>
            </body></html>"#,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(r#"<title>About</title><a href="/">Home</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    mount_get(&server, "/blog", html(r#"<h1>Blog</h1><a href="/blog/post">Post</a>"#)).await;
    mount_get(&server, "/blog/post", html("<title>Post</title>")).await;

    let result = crawl_site(test_fetcher(), &SiteCrawl::new(root.clone()).agent("testbot"))
        .await
        .expect("Crawl failed");

    assert_eq!(result.len(), 4);
    assert!(result.urls().all(|url| url.starts_with(&server.uri())));

    let home = result.get(&root).unwrap();
    assert_eq!(home.status, 200);
    assert_eq!(home.depth, 0);
    assert_eq!(home.outlinks, 3);
    assert_eq!(home.inlinks, 2);
    assert_eq!(home.title, "Home");
    assert_eq!(home.description, "Welcome");

    let post = result.get(&format!("{}/blog/post", server.uri())).unwrap();
    assert_eq!(post.depth, 2);
    assert_eq!(post.inlinks, 1);
    assert!(!post.is_orphan);

    let blog = result.get(&format!("{}/blog", server.uri())).unwrap();
    assert_eq!(blog.h1, "Blog");
    assert_eq!(blog.title_length, 0);
}

#[tokio::test]
async fn test_robots_blocked_page_is_recorded_but_not_fetched() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    mount_get(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
    )
    .await;
    mount_get(
        &server,
        "/",
        html(r#"<a href="/private/report">Report</a><a href="/public">Public</a>"#),
    )
    .await;
    mount_get(&server, "/public", html("<title>Public</title>")).await;
    Mock::given(method("GET"))
        .and(path("/private/report"))
        .respond_with(html("secret"))
        .expect(0)
        .mount(&server)
        .await;

    let result = crawl_site(test_fetcher(), &SiteCrawl::new(root))
        .await
        .expect("Crawl failed");

    let blocked = result
        .get(&format!("{}/private/report", server.uri()))
        .unwrap();
    assert!(blocked.blocked_by_robots);
    assert_eq!(blocked.status, 0);
    assert_eq!(blocked.inlinks, 0);
    assert!(blocked.is_orphan);

    let analysis = CrawlAnalysis::from_result(&result);
    assert_eq!(analysis.blocked_by_robots, 1);
    assert_eq!(analysis.fetch_failures, 0);
}

#[tokio::test]
async fn test_robots_ignored_when_not_respected() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    mount_get(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"),
    )
    .await;
    mount_get(&server, "/", html(r#"<a href="/page">Page</a>"#)).await;
    mount_get(&server, "/page", html("<title>Page</title>")).await;

    let result = crawl_site(test_fetcher(), &SiteCrawl::new(root).respect_robots(false))
        .await
        .expect("Crawl failed");

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|(_, record)| !record.blocked_by_robots));
}

#[tokio::test]
async fn test_redirect_target_enqueued_at_same_depth() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    mount_get(
        &server,
        "/",
        html(r#"<a href="/old">Old</a><a href="/away">Away</a>"#),
    )
    .await;
    mount_get(
        &server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", "/new"),
    )
    .await;
    mount_get(
        &server,
        "/away",
        ResponseTemplate::new(302).insert_header("location", "https://elsewhere.example/"),
    )
    .await;
    mount_get(&server, "/new", html("<title>New</title>")).await;

    let result = crawl_site(test_fetcher(), &SiteCrawl::new(root))
        .await
        .expect("Crawl failed");

    let old = result.get(&format!("{}/old", server.uri())).unwrap();
    assert_eq!(old.status, 301);
    assert_eq!(old.depth, 1);

    let new = result.get(&format!("{}/new", server.uri())).unwrap();
    assert_eq!(new.status, 200);
    assert_eq!(new.depth, 1);
    assert_eq!(new.title, "New");

    assert_eq!(result.get(&format!("{}/away", server.uri())).unwrap().status, 302);
    assert!(result.urls().all(|url| !url.contains("elsewhere.example")));
}

#[tokio::test]
async fn test_root_redirect_within_host_keeps_root() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    mount_get(
        &server,
        "/",
        ResponseTemplate::new(301).insert_header("location", "/home"),
    )
    .await;
    mount_get(&server, "/home", html("<title>Home</title>")).await;

    let result = crawl_site(test_fetcher(), &SiteCrawl::new(root.clone()))
        .await
        .expect("Crawl failed");

    assert_eq!(result.get(&root).unwrap().status, 301);
    let home = result.get(&format!("{}/home", server.uri())).unwrap();
    assert_eq!(home.depth, 0);
    assert_eq!(home.status, 200);
}

#[tokio::test]
async fn test_error_status_is_recorded() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    mount_get(
        &server,
        "/",
        html(r#"<a href="/missing">Missing</a><a href="/broken">Broken</a>"#),
    )
    .await;
    mount_get(
        &server,
        "/broken",
        ResponseTemplate::new(500).set_body_string(r#"<title>Oops</title><a href="/status">Status</a>"#),
    )
    .await;
    mount_get(&server, "/status", html("ok")).await;

    let result = crawl_site(test_fetcher(), &SiteCrawl::new(root))
        .await
        .expect("Crawl failed");

    let missing = result.get(&format!("{}/missing", server.uri())).unwrap();
    assert_eq!(missing.status, 404);

    let broken = result.get(&format!("{}/broken", server.uri())).unwrap();
    assert_eq!(broken.status, 500);
    assert_eq!(broken.title, "");
    assert_eq!(broken.outlinks, 1);
    assert!(result.contains(&format!("{}/status", server.uri())));

    let analysis = CrawlAnalysis::from_result(&result);
    assert_eq!(analysis.status_4xx, 1);
    assert_eq!(analysis.status_5xx, 1);
}

#[tokio::test]
async fn test_fail_fast_aborts_on_network_error() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    mount_get(&server, "/", html(r#"<a href="/slow">Slow</a>"#)).await;
    mount_get(
        &server,
        "/slow",
        html("late").set_delay(Duration::from_secs(2)),
    )
    .await;

    let err = crawl_site(impatient_fetcher(), &SiteCrawl::new(root.clone()))
        .await
        .unwrap_err();

    match err {
        FawnError::CrawlAborted { root: aborted, source } => {
            assert_eq!(aborted, root);
            assert_eq!(source.status(), 0);
        }
        other => panic!("Expected CrawlAborted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_network_error_recorded_without_fail_fast() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    mount_get(&server, "/", html(r#"<a href="/slow">Slow</a>"#)).await;
    mount_get(
        &server,
        "/slow",
        html("late").set_delay(Duration::from_secs(2)),
    )
    .await;

    let result = crawl_site(impatient_fetcher(), &SiteCrawl::new(root).fail_fast(false))
        .await
        .expect("Crawl failed");

    let slow = result.get(&format!("{}/slow", server.uri())).unwrap();
    assert_eq!(slow.status, 0);
    assert!(!slow.blocked_by_robots);
    assert_eq!(CrawlAnalysis::from_result(&result).fetch_failures, 1);
}

#[tokio::test]
async fn test_concurrent_crawl_fetches_each_page_once() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">p{}</a>"#, i, i))
        .collect();
    mount_get(&server, "/", html(&links)).await;
    for i in 0..10 {
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(html(r#"<a href="/">home</a><a href="/p0">first</a>"#))
            .expect(1)
            .mount(&server)
            .await;
    }

    let result = crawl_site(test_fetcher(), &SiteCrawl::new(root).max_concurrency(4))
        .await
        .expect("Crawl failed");

    assert_eq!(result.len(), 11);
    assert!(result.iter().all(|(_, record)| record.status == 200));
}

#[tokio::test]
async fn test_crawl_and_export() {
    let server = MockServer::start().await;
    let root = format!("{}/", server.uri());

    mount_get(
        &server,
        "/",
        html(&format!(
            r#"<title>Home</title><link rel="canonical" href="{}"><a href="/about">About</a>"#,
            root
        )),
    )
    .await;
    mount_get(&server, "/about", html("<title>About</title>")).await;

    let result = crawl_site(test_fetcher(), &SiteCrawl::new(root.clone()))
        .await
        .expect("Crawl failed");
    assert!(result.get(&root).unwrap().is_self_canonicalizing);

    let dir = tempfile::tempdir().unwrap();
    let analysis = CrawlAnalysis::from_result(&result);
    let report = SiteReport {
        root: &root,
        crawled_at: Utc::now(),
        config_hash: "test",
        result: &result,
        analysis: &analysis,
    };

    let db = SqliteExport::open(&dir.path().join("fawnbot.db")).unwrap();
    db.export(&report).unwrap();
    let markdown = MarkdownExport::new(dir.path().join("summaries"));
    markdown.export(&report).unwrap();

    let latest = db.latest_analyses().unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].analysis.total_urls, 2);
    assert_eq!(latest[0].analysis.missing_canonicals, 1);
    assert_eq!(db.page_count(&root).unwrap(), 2);

    let written = std::fs::read_dir(dir.path().join("summaries")).unwrap().count();
    assert_eq!(written, 1);
    assert!(markdown.report_path(&report).exists());
}

#[test]
fn test_load_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("fawnbot.toml");
    std::fs::write(
        &config_path,
        r#"
[user-agent]
crawler-name = "fawnbot"
crawler-version = "1.0"
contact-url = "https://example.com/bot"

[output]
database-path = "./fawnbot.db"
summary-dir = "./summaries"

[[site]]
root = "https://example.com/"

[[site]]
root = "https://www.example.org/"
respect-robots = false
crawl-start = "2025-01-06"
crawl-frequency = "weekly"

[[site]]
root = "not a url"
"#,
    )
    .unwrap();

    let (config, hash) = load_config_with_hash(&config_path).unwrap();

    assert_eq!(hash.len(), 64);
    assert_eq!(config.sites.len(), 2);
    assert_eq!(config.crawler.max_concurrent_fetches, 1);

    let options = SiteCrawl::from_config(&config, &config.sites[1]);
    assert_eq!(options.agent, "fawnbot");
    assert!(!options.respect_robots);
    assert!(options.fail_fast);
}
