//! Web API tests for the RSS feed.

mod common;

use axum::http::header::{CONTENT_TYPE, HOST};
use serde_json::{json, Value};

use common::{api_key_header, article_page, create_test_app, create_test_app_with_config, TEST_API_KEY};

async fn submit(app: &common::TestApp, url: &str, title: &str) -> i64 {
    app.fetcher.add_page(url, article_page(title, title));
    let body: Value = app
        .server
        .post("/submit")
        .add_header(api_key_header(), TEST_API_KEY)
        .json(&json!({ "url": url }))
        .await
        .json();
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_feed_empty() {
    let app = create_test_app().await;

    let response = app.server.get("/rss").await;
    response.assert_status_ok();
    assert_eq!(
        response.header(CONTENT_TYPE),
        "application/rss+xml; charset=utf-8"
    );

    let channel = rss::Channel::read_from(response.text().as_bytes()).unwrap();
    assert_eq!(channel.title(), "My Personal Article Feed");
    assert!(channel.items().is_empty());
}

#[tokio::test]
async fn test_feed_lists_articles_newest_first() {
    let app = create_test_app().await;
    submit(&app, "https://blog.test/first", "First Post").await;
    submit(&app, "https://blog.test/second", "Second Post").await;

    let xml = app.server.get("/rss").await.text();

    let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
    let titles: Vec<_> = channel.items().iter().filter_map(|i| i.title()).collect();
    assert_eq!(titles, vec!["Second Post", "First Post"]);

    let item = &channel.items()[0];
    assert_eq!(item.link(), Some("https://blog.test/second"));
    assert_eq!(item.guid().unwrap().value(), "https://blog.test/second");
    assert!(item.pub_date().is_some());
    assert!(item.content().unwrap().contains("Second Post"));

    let feed = feed_rs::parser::parse(xml.as_bytes()).unwrap();
    assert_eq!(feed.entries.len(), 2);
}

#[tokio::test]
async fn test_feed_respects_limit() {
    let mut config = common::test_config();
    config.feed.limit = 2;
    let app = create_test_app_with_config(config).await;
    for i in 0..3 {
        submit(&app, &format!("https://blog.test/{i}"), &format!("Post {i}")).await;
    }

    let xml = app.server.get("/rss").await.text();
    let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
    assert_eq!(channel.items().len(), 2);
}

#[tokio::test]
async fn test_feed_self_link_from_host_header() {
    let mut config = common::test_config();
    config.feed.public_url = None;
    let app = create_test_app_with_config(config).await;

    let xml = app
        .server
        .get("/rss")
        .add_header(HOST, "reader.test:8000")
        .await
        .text();

    let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
    assert_eq!(channel.link(), "http://reader.test:8000");
    assert!(xml.contains("http://reader.test:8000/rss"));
}

#[tokio::test]
async fn test_feed_ignores_unusable_host_header() {
    let mut config = common::test_config();
    config.feed.public_url = None;
    let app = create_test_app_with_config(config).await;
    submit(&app, "https://blog.test/first", "First Post").await;

    let xml = app.server.get("/rss").add_header(HOST, "a b").await.text();

    let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
    assert_eq!(channel.title(), "My Personal Article Feed");
    assert_eq!(channel.link(), "http://localhost");
    assert!(xml.contains("http://localhost/rss"));
    assert!(!xml.contains("http://a b"));
    assert_eq!(channel.items().len(), 1);
    assert_eq!(channel.items()[0].link(), Some("https://blog.test/first"));
}

#[tokio::test]
async fn test_feed_falls_back_on_database_failure() {
    let app = create_test_app().await;
    submit(&app, "https://blog.test/first", "First Post").await;
    app.db.close().await;

    let response = app.server.get("/rss").await;
    response.assert_status_ok();
    assert_eq!(
        response.header(CONTENT_TYPE),
        "application/rss+xml; charset=utf-8"
    );

    let xml = response.text();
    let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
    assert_eq!(channel.title(), "Error: My Personal Article Feed");
    assert!(channel.items().is_empty());
    assert!(feed_rs::parser::parse(xml.as_bytes()).is_ok());
}
