//! Submission pipeline: fetch, extract, sanitize, hash.

use std::sync::Arc;

use tracing::{info, warn};

use super::extractor::extract;
use super::fetcher::PageFetcher;
use super::hasher::content_hash;
use super::sanitizer::sanitize_html;
use crate::article::ArticleMetadata;

/// A processed article ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedArticle {
    /// Title.
    pub title: String,
    /// Author.
    pub author: Option<String>,
    /// Sanitized body HTML.
    pub content: String,
    /// SHA-256 hex of `content`.
    pub content_hash: String,
    /// The submitted URL.
    pub source_url: String,
    /// Extraction metadata.
    pub metadata: ArticleMetadata,
}

/// Result of running the pipeline on a URL.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// Content was fetched and extracted.
    Processed(ProcessedArticle),
    /// The page could not be fetched.
    NotFetched,
    /// The page was fetched but no article could be extracted.
    NotExtracted,
}

/// Runs the content pipeline.
#[derive(Clone)]
pub struct ContentProcessor {
    fetcher: Arc<dyn PageFetcher>,
}

impl ContentProcessor {
    /// Create a processor around a fetcher.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch `url` and turn it into a sanitized, hashed article.
    pub async fn process_url(&self, url: &str) -> ProcessOutcome {
        let Some(html) = self.fetcher.fetch(url).await else {
            return ProcessOutcome::NotFetched;
        };

        let Some(extracted) = extract(&html, Some(url)) else {
            warn!(url, "No readable article found");
            return ProcessOutcome::NotExtracted;
        };

        let content = sanitize_html(&extracted.content);
        if content.trim().is_empty() {
            warn!(url, "Article body empty after sanitization");
            return ProcessOutcome::NotExtracted;
        }
        let content_hash = content_hash(&content);

        info!(url, title = %extracted.title, hash = %content_hash, "Processed article");

        ProcessOutcome::Processed(ProcessedArticle {
            title: extracted.title,
            author: extracted.author,
            content,
            content_hash,
            source_url: url.to_string(),
            metadata: extracted.metadata,
        })
    }
}

impl std::fmt::Debug for ContentProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentProcessor").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapFetcher(HashMap<String, String>);

    #[async_trait]
    impl PageFetcher for MapFetcher {
        async fn fetch(&self, url: &str) -> Option<String> {
            self.0.get(url).cloned()
        }
    }

    fn page(body: &str) -> String {
        let para = "Long form writing about storage engines and how they keep \
                    data safe across crashes, with enough words in every sentence \
                    to look like a real article to the readability scorer.";
        format!(
            "<html><head><title>Storage</title></head><body><article>\
             <p>{body}</p><p>{para}</p><p>{para}</p><p>{para}</p>\
             <script>track()</script></article></body></html>"
        )
    }

    fn processor(pages: &[(&str, String)]) -> ContentProcessor {
        let map = pages
            .iter()
            .map(|(url, html)| (url.to_string(), html.clone()))
            .collect();
        ContentProcessor::new(Arc::new(MapFetcher(map)))
    }

    #[tokio::test]
    async fn test_processed() {
        let p = processor(&[("https://a.test/1", page("First"))]);

        match p.process_url("https://a.test/1").await {
            ProcessOutcome::Processed(article) => {
                assert_eq!(article.title, "Storage");
                assert_eq!(article.source_url, "https://a.test/1");
                assert!(!article.content.contains("track()"));
                assert_eq!(article.content_hash, content_hash(&article.content));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_same_page_different_urls_hash_equal() {
        let html = page("Shared");
        let p = processor(&[("https://a.test/x", html.clone()), ("https://a.test/y", html)]);

        let (ProcessOutcome::Processed(a), ProcessOutcome::Processed(b)) = (
            p.process_url("https://a.test/x").await,
            p.process_url("https://a.test/y").await,
        ) else {
            panic!("expected both pages to process");
        };
        assert_eq!(a.content_hash, b.content_hash);
    }

    #[tokio::test]
    async fn test_not_fetched() {
        let p = processor(&[]);
        assert_eq!(
            p.process_url("https://a.test/missing").await,
            ProcessOutcome::NotFetched
        );
    }

    #[tokio::test]
    async fn test_not_extracted() {
        let p = processor(&[("https://a.test/empty", "<html><body></body></html>".into())]);
        assert_eq!(
            p.process_url("https://a.test/empty").await,
            ProcessOutcome::NotExtracted
        );
    }
}
