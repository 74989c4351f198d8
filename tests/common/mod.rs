//! Test helpers for web API tests.
//!
//! Builds the router over an in-memory database with a stub page fetcher.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::HeaderName;
use axum_test::TestServer;

use article_saver::config::Config;
use article_saver::web::handlers::AppState;
use article_saver::web::router::create_router;
use article_saver::{ContentProcessor, Database, PageFetcher};

/// API key configured on test servers.
pub const TEST_API_KEY: &str = "test-api-key";

/// Header carrying the API key.
pub fn api_key_header() -> HeaderName {
    HeaderName::from_static("x-api-key")
}

/// Page fetcher serving canned HTML and counting calls.
#[derive(Default)]
pub struct StubFetcher {
    pages: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
}

impl StubFetcher {
    /// Serve `html` for `url`.
    pub fn add_page(&self, url: &str, html: impl Into<String>) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), html.into());
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.lock().unwrap().get(url).cloned()
    }
}

/// A running test server with handles on its collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub fetcher: Arc<StubFetcher>,
}

/// Test configuration with an API key.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.auth.api_key = TEST_API_KEY.to_string();
    config.feed.public_url = Some("https://saver.test".to_string());
    config
}

/// Create a test server with the default test configuration.
pub async fn create_test_app() -> TestApp {
    create_test_app_with_config(test_config()).await
}

/// Create a test server with the given configuration.
pub async fn create_test_app_with_config(config: Config) -> TestApp {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let fetcher = Arc::new(StubFetcher::default());
    let processor = ContentProcessor::new(fetcher.clone());

    let app_state = Arc::new(AppState::new(db.clone(), processor, &config));
    let router = create_router(app_state, &config.web.cors_origins);
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        fetcher,
    }
}

/// An article page long enough for readability extraction.
pub fn article_page(title: &str, topic: &str) -> String {
    let para = format!(
        "This paragraph discusses {topic} in some depth. It contains enough \
         sentences and words that the readability pass treats it as the main \
         content of the page rather than a navigation block or a footer."
    );
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title><meta name="description" content="About {topic}"></head>
<body>
  <nav><a href="/">Home</a></nav>
  <article>
    <h1>{title}</h1>
    <p>{para}</p>
    <p>{para} <a href="https://example.com/more" onclick="track()">More</a></p>
    <p>{para}</p>
    <script>track()</script>
  </article>
</body>
</html>"#
    )
}
