//! Integration tests for the fetcher and the scanning pipeline
//!
//! These tests use wiremock to create mock HTTP servers. Backoff delays go
//! through a recording delay, so retries run without real sleeping.

use menu_scanner::config::Config;
use menu_scanner::output::ScanResponse;
use menu_scanner::scanner::{
    build_http_client, FetchedPage, PageFetcher, PageSource, RecordingDelay, RetryPolicy,
};
use menu_scanner::{FetchError, FetchFailure, ScanOptions, Scanner};
use std::future::Future;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MENU_HTML: &str = r##"<html><head><title>Home</title></head><body>
    <header><nav class="main-navigation">
        <a href="/">Home</a>
        <a href="/about">About</a>
        <a href="/price.pdf">Price list</a>
        <a href="#content">Skip</a>
        <a href="/about">About</a>
        <a href="https://shop.example.com" target="_blank" rel="noopener">Shop</a>
    </nav></header>
    <main><a href="/not-menu">Not menu</a></main>
</body></html>"##;

const CYRILLIC_HTML: &str = r#"<html><body>
    <div id="site-navigation"><a href="/">Главная</a><a href="/kontakty">Контакты</a></div>
</body></html>"#;

fn html_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

fn policy(max_retries: u32, retry_delay_ms: u64) -> RetryPolicy {
    RetryPolicy {
        timeout: Duration::from_secs(5),
        max_retries,
        retry_delay: Duration::from_millis(retry_delay_ms),
    }
}

fn recording_fetcher(config: &Config) -> (PageFetcher<RecordingDelay>, RecordingDelay) {
    let delay = RecordingDelay::new();
    let client = build_http_client(config).expect("Failed to build client");
    (PageFetcher::with_delay(client, delay.clone()), delay)
}

fn server_url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).expect("Failed to parse mock URL")
}

#[tokio::test]
async fn test_fetch_success_first_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_exists("user-agent"))
        .respond_with(html_response(MENU_HTML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (fetcher, delay) = recording_fetcher(&Config::default());
    let page = fetcher
        .fetch(&server_url(&mock_server, "/"), &policy(3, 100))
        .await
        .expect("Fetch failed");

    assert_eq!(page.attempts, 1);
    assert_eq!(page.status_code, 200);
    assert!(page.body.contains("main-navigation"));
    assert!(delay.calls().is_empty());
}

#[tokio::test]
async fn test_fetch_fails_twice_then_succeeds() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_response(MENU_HTML))
        .mount(&mock_server)
        .await;

    let (fetcher, delay) = recording_fetcher(&Config::default());
    let page = fetcher
        .fetch(&server_url(&mock_server, "/"), &policy(3, 100))
        .await
        .expect("Fetch should succeed on the third attempt");

    assert_eq!(page.attempts, 3);
    // No delay before attempt 1, then d and 2d
    assert_eq!(
        delay.calls(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[tokio::test]
async fn test_fetch_always_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_response(MENU_HTML).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let (fetcher, delay) = recording_fetcher(&Config::default());
    let policy = RetryPolicy {
        timeout: Duration::from_millis(50),
        max_retries: 3,
        retry_delay: Duration::from_millis(10),
    };

    let err = fetcher
        .fetch(&server_url(&mock_server, "/"), &policy)
        .await
        .expect_err("Fetch should time out");

    assert_eq!(err.attempts, 3);
    assert_eq!(err.cause, FetchFailure::Timeout(50));
    assert_eq!(delay.calls().len(), 2);
}

#[tokio::test]
async fn test_fetch_rejects_non_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let (fetcher, _delay) = recording_fetcher(&Config::default());
    let err = fetcher
        .fetch(&server_url(&mock_server, "/"), &policy(2, 10))
        .await
        .expect_err("JSON is not HTML");

    assert_eq!(err.attempts, 2);
    assert!(matches!(err.cause, FetchFailure::UnexpectedContentType(ref ct) if ct == "application/json"));
}

#[tokio::test]
async fn test_fetch_http_status_after_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&mock_server)
        .await;

    let (fetcher, _delay) = recording_fetcher(&Config::default());
    let err = fetcher
        .fetch(&server_url(&mock_server, "/missing"), &policy(3, 10))
        .await
        .expect_err("404 should fail");

    assert_eq!(err.cause, FetchFailure::HttpStatus(404));
    assert!(err.to_string().contains("after 3 attempt(s)"));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Bind and drop a listener to get a port nothing listens on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("No local addr").port()
    };
    let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

    let (fetcher, _delay) = recording_fetcher(&Config::default());
    let err = fetcher
        .fetch(&url, &policy(1, 10))
        .await
        .expect_err("Nothing is listening");

    assert_eq!(err.attempts, 1);
    assert!(matches!(err.cause, FetchFailure::TransportFailure(_)));
}

#[tokio::test]
async fn test_custom_headers_override_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("accept", "text/html"))
        .and(header("x-scanner-test", "yes"))
        .respond_with(html_response(MENU_HTML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config
        .headers
        .insert("Accept".to_string(), "text/html".to_string());
    config
        .headers
        .insert("X-Scanner-Test".to_string(), "yes".to_string());

    let (fetcher, _delay) = recording_fetcher(&config);
    let page = fetcher
        .fetch(&server_url(&mock_server, "/"), &policy(1, 10))
        .await
        .expect("Headers should match");
    assert_eq!(page.attempts, 1);
}

/// Sends every normalized address to the mock server under `/{host}/`
struct RoutedFetcher {
    fetcher: PageFetcher<RecordingDelay>,
    base: Url,
}

impl PageSource for RoutedFetcher {
    fn fetch_page(
        &self,
        url: &Url,
        policy: &RetryPolicy,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send {
        let host = url.host_str().unwrap_or_default().to_string();
        let routed = self
            .base
            .join(&format!("/{}/", host))
            .expect("Failed to route URL");
        async move { self.fetcher.fetch(&routed, policy).await }
    }
}

#[tokio::test]
async fn test_end_to_end_scan() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/example.com/"))
        .respond_with(html_response(MENU_HTML))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xn--80aswg.xn--p1ai/"))
        .respond_with(html_response(CYRILLIC_HTML))
        .mount(&mock_server)
        .await;

    let (fetcher, _delay) = recording_fetcher(&Config::default());
    let source = RoutedFetcher {
        fetcher,
        base: Url::parse(&mock_server.uri()).unwrap(),
    };
    let scanner = Scanner::new(source, ScanOptions::default());

    let report = scanner
        .scan(&["example.com", "not a domain", "сайт.рф"])
        .await;

    assert_eq!(report.total_processed, 3);
    assert_eq!(report.error_count, 1);

    let first = &report.results[0];
    assert_eq!(first.site_url(), "example.com");
    assert!(first.error().is_none());
    let texts: Vec<_> = first.items().iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Home", "About", "Shop"]);
    assert_eq!(first.items()[2].target.as_deref(), Some("_blank"));

    let second = &report.results[1];
    assert!(second.error().is_some());
    assert!(second.items().is_empty());

    let third = &report.results[2];
    assert_eq!(third.site_url(), "сайт.рф");
    assert!(third.error().is_none());
    let texts: Vec<_> = third.items().iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Главная", "Контакты"]);

    let json = serde_json::to_value(ScanResponse::from(report)).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["totalProcessed"], 3);
    assert_eq!(json["errors"], 1);
}

#[tokio::test]
async fn test_unreachable_site_reported_with_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/up.example.com/"))
        .respond_with(html_response(MENU_HTML))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/down.example.com/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (fetcher, delay) = recording_fetcher(&Config::default());
    let source = RoutedFetcher {
        fetcher,
        base: Url::parse(&mock_server.uri()).unwrap(),
    };
    let options = ScanOptions {
        batch_size: 2,
        max_retries: 2,
        ..ScanOptions::default()
    };
    let scanner = Scanner::new(source, options);

    let report = scanner
        .scan(&["down.example.com", "up.example.com"])
        .await;

    assert_eq!(report.error_count, 1);
    let error = report.results[0].error().expect("down site should fail");
    assert!(error.contains("503"), "unexpected error: {}", error);
    assert_eq!(report.results[1].items().len(), 3);
    // One backoff for the failing site, default base delay
    assert_eq!(delay.calls(), vec![Duration::from_millis(1000)]);
}
