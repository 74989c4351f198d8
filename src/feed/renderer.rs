//! RSS 2.0 feed rendering.
//!
//! [`FeedRenderer::render_or_fallback`] is the only place feed failures are
//! handled: any query or rendering error becomes a minimal error channel so
//! that readers always receive a well-formed document.

use std::collections::BTreeMap;

use chrono::Utc;
use rss::extension::atom::{AtomExtension, Link};
use rss::{Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use tracing::error;

use crate::article::Article;
use crate::config::FeedConfig;
use crate::{Result, SaverError};

/// Namespace for `content:encoded`.
pub const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// MIME type of the rendered document.
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

const GENERATOR: &str = "Article Saver";

/// Served if even the error channel cannot be rendered.
const STATIC_ERROR_FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0"><channel><title>Error</title><link>/</link><description>Feed unavailable</description></channel></rss>"#;

/// Renders articles as an RSS 2.0 channel.
#[derive(Debug, Clone)]
pub struct FeedRenderer {
    title: String,
    description: String,
    language: String,
    base_url: String,
}

impl FeedRenderer {
    /// Create a renderer. `base_url` is the public root of this service.
    pub fn new(config: &FeedConfig, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the feed itself.
    pub fn self_link(&self) -> String {
        format!("{}/rss", self.base_url)
    }

    /// Permalink of an article on this service.
    pub fn permalink(&self, article_id: i64) -> String {
        format!("{}/articles/{}", self.base_url, article_id)
    }

    fn check_base_url(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map(|_| ())
            .map_err(|e| SaverError::Feed(format!("invalid base URL {:?}: {}", self.base_url, e)))
    }

    fn channel(&self, title: String, description: String, items: Vec<Item>) -> Channel {
        let mut self_link = Link::default();
        self_link.set_href(self.self_link());
        self_link.set_rel("self");
        self_link.set_mime_type(Some("application/rss+xml".to_string()));

        let mut namespaces = BTreeMap::new();
        namespaces.insert("content".to_string(), CONTENT_NAMESPACE.to_string());

        ChannelBuilder::default()
            .title(title)
            .link(self.base_url.clone())
            .description(description)
            .language(Some(self.language.clone()))
            .generator(Some(GENERATOR.to_string()))
            .last_build_date(Some(Utc::now().to_rfc2822()))
            .namespaces(namespaces)
            .atom_ext(Some(AtomExtension {
                links: vec![self_link],
            }))
            .items(items)
            .build()
    }

    fn item(&self, article: &Article) -> Item {
        let link = article
            .source_url
            .clone()
            .unwrap_or_else(|| self.permalink(article.id));

        let guid = GuidBuilder::default()
            .value(link.clone())
            .permalink(true)
            .build();

        ItemBuilder::default()
            .title(Some(article.title.clone()))
            .link(Some(link))
            .guid(Some(guid))
            .pub_date(Some(article.created_at.to_rfc2822()))
            .author(article.author.clone())
            .description(article.extra_metadata.description.clone())
            .content(Some(article.content.clone()))
            .build()
    }

    fn write(channel: &Channel) -> Result<String> {
        let bytes = channel
            .write_to(Vec::new())
            .map_err(|e| SaverError::Feed(format!("failed to write feed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| SaverError::Feed(format!("feed is not UTF-8: {}", e)))
    }

    /// Render `articles` (newest first) as an RSS document.
    pub fn render(&self, articles: &[Article]) -> Result<String> {
        self.check_base_url()?;
        let items = articles.iter().map(|a| self.item(a)).collect();
        let channel = self.channel(self.title.clone(), self.description.clone(), items);
        Self::write(&channel)
    }

    /// A minimal channel reporting `summary`.
    pub fn error_feed(&self, summary: &str) -> Result<String> {
        let channel = self.channel(format!("Error: {}", self.title), summary.to_string(), Vec::new());
        Self::write(&channel)
    }

    /// Render the articles, or the error channel if loading or rendering failed.
    pub fn render_or_fallback(&self, articles: Result<Vec<Article>>) -> String {
        let rendered = articles.and_then(|articles| self.render(&articles));
        match rendered {
            Ok(xml) => xml,
            Err(e) => {
                error!("Failed to generate RSS feed: {}", e);
                self.error_feed(&format!("Error generating feed: {}", e))
                    .unwrap_or_else(|e| {
                        error!("Failed to render error feed: {}", e);
                        STATIC_ERROR_FEED.to_string()
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::{ArticleMetadata, SourceType};
    use chrono::{TimeZone, Utc};

    fn renderer() -> FeedRenderer {
        FeedRenderer::new(&FeedConfig::default(), "https://saver.test/")
    }

    fn article(id: i64, source_url: Option<&str>) -> Article {
        Article {
            id,
            title: format!("Article {id}"),
            author: Some("Ada".to_string()),
            source_url: source_url.map(str::to_string),
            source_type: SourceType::Url,
            content: "<p>Body &amp; more</p>".to_string(),
            content_hash: "0".repeat(64),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            read_status: false,
            extra_metadata: ArticleMetadata {
                description: Some("Summary".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_render_items() {
        let xml = renderer()
            .render(&[article(2, Some("https://blog.test/two")), article(1, None)])
            .unwrap();

        let channel = Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(channel.title(), FeedConfig::default().title);
        assert_eq!(channel.link(), "https://saver.test");
        assert_eq!(channel.language(), Some("en"));
        assert_eq!(channel.items().len(), 2);

        let first = &channel.items()[0];
        assert_eq!(first.title(), Some("Article 2"));
        assert_eq!(first.link(), Some("https://blog.test/two"));
        let guid = first.guid().unwrap();
        assert_eq!(guid.value(), "https://blog.test/two");
        assert!(guid.is_permalink());
        let pub_date = chrono::DateTime::parse_from_rfc2822(first.pub_date().unwrap()).unwrap();
        assert_eq!(pub_date, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());
        assert_eq!(first.description(), Some("Summary"));
        assert_eq!(first.content(), Some("<p>Body &amp; more</p>"));

        let second = &channel.items()[1];
        assert_eq!(second.link(), Some("https://saver.test/articles/1"));
    }

    #[test]
    fn test_render_declares_namespaces_and_self_link() {
        let xml = renderer().render(&[article(1, None)]).unwrap();
        assert!(xml.contains("xmlns:content=\"http://purl.org/rss/1.0/modules/content/\""));
        assert!(xml.contains("xmlns:atom="));
        assert!(xml.contains("https://saver.test/rss"));
        assert!(xml.contains("rel=\"self\""));
    }

    #[test]
    fn test_render_empty() {
        let xml = renderer().render(&[]).unwrap();
        let channel = Channel::read_from(xml.as_bytes()).unwrap();
        assert!(channel.items().is_empty());
    }

    #[test]
    fn test_render_parses_with_feed_rs() {
        let xml = renderer().render(&[article(1, None)]).unwrap();
        let feed = feed_rs::parser::parse(xml.as_bytes()).unwrap();
        assert_eq!(feed.entries.len(), 1);
    }

    #[test]
    fn test_invalid_base_url_is_feed_error() {
        let bad = FeedRenderer::new(&FeedConfig::default(), "not a url");
        assert!(matches!(bad.render(&[]), Err(SaverError::Feed(_))));
    }

    #[test]
    fn test_fallback_on_query_error() {
        let xml = renderer().render_or_fallback(Err(SaverError::Database("boom".to_string())));

        let channel = Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(
            channel.title(),
            format!("Error: {}", FeedConfig::default().title)
        );
        assert!(channel.description().contains("boom"));
        assert!(channel.items().is_empty());
    }

    #[test]
    fn test_fallback_passes_through_success() {
        let xml = renderer().render_or_fallback(Ok(vec![article(1, None)]));
        let channel = Channel::read_from(xml.as_bytes()).unwrap();
        assert_eq!(channel.items().len(), 1);
    }

    #[test]
    fn test_static_error_feed_is_valid() {
        assert!(Channel::read_from(STATIC_ERROR_FEED.as_bytes()).is_ok());
    }
}
