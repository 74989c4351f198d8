//! Article service for Article Saver.
//!
//! This module provides the submission use case on top of the content
//! pipeline and the repositories.

use tracing::{info, warn};

use super::repository::ArticleRepository;
use super::source::{domain_of, SourceRepository};
use super::types::{Article, ArticleQuery, NewArticle, SourceType};
use crate::content::{ContentProcessor, ProcessOutcome};
use crate::db::Database;
use crate::{Result, SaverError};

/// A page of articles with the size of the filtered set.
#[derive(Debug, Clone)]
pub struct ArticleList {
    /// Articles on this page, newest first.
    pub articles: Vec<Article>,
    /// Number of articles matching the filter, ignoring pagination.
    pub total: i64,
}

/// Service for article operations.
pub struct ArticleService<'a> {
    db: &'a Database,
    processor: &'a ContentProcessor,
}

impl<'a> ArticleService<'a> {
    /// Create a new ArticleService.
    pub fn new(db: &'a Database, processor: &'a ContentProcessor) -> Self {
        Self { db, processor }
    }

    /// Save the article at `url`.
    ///
    /// Returns the stored article and `true` if it was newly created, or the
    /// existing article with identical content and `false`.
    ///
    /// # Errors
    ///
    /// - [`SaverError::Fetch`] if the page could not be fetched
    /// - [`SaverError::Extraction`] if no article could be extracted
    /// - [`SaverError::Database`] or [`SaverError::Conflict`] on storage failure
    pub async fn submit(&self, url: &str) -> Result<(Article, bool)> {
        let processed = match self.processor.process_url(url).await {
            ProcessOutcome::Processed(p) => p,
            ProcessOutcome::NotFetched => {
                return Err(SaverError::Fetch(format!("could not fetch content from {url}")));
            }
            ProcessOutcome::NotExtracted => {
                return Err(SaverError::Extraction(format!(
                    "could not extract an article from {url}"
                )));
            }
        };

        let mut new_article =
            NewArticle::new(processed.title, processed.content, processed.content_hash)
                .with_source_url(processed.source_url)
                .with_source_type(SourceType::Url)
                .with_metadata(processed.metadata);
        if let Some(author) = processed.author {
            new_article = new_article.with_author(author);
        }

        let (article, created) = ArticleRepository::new(self.db.pool())
            .create_or_get(&new_article)
            .await?;

        if let Some(domain) = domain_of(url) {
            if let Err(e) = SourceRepository::new(self.db.pool())
                .record(&domain, SourceType::Url)
                .await
            {
                warn!(domain = %domain, "Failed to record source: {}", e);
            }
        }

        if created {
            info!(article_id = article.id, url, "Article saved");
        } else {
            info!(article_id = article.id, url, "Article already saved");
        }
        Ok((article, created))
    }

    /// List articles with the total for the same filter.
    pub async fn list(&self, query: &ArticleQuery) -> Result<ArticleList> {
        let repo = ArticleRepository::new(self.db.pool());
        let articles = repo.list(query).await?;
        let total = repo.count(query.unread_only).await?;
        Ok(ArticleList { articles, total })
    }

    /// Get an article by ID.
    pub async fn get(&self, id: i64) -> Result<Article> {
        ArticleRepository::new(self.db.pool())
            .get_by_id(id)
            .await?
            .ok_or_else(|| SaverError::NotFound("article".to_string()))
    }

    /// Mark an article read or unread.
    pub async fn set_read_status(&self, id: i64, read: bool) -> Result<Article> {
        ArticleRepository::new(self.db.pool())
            .set_read_status(id, read)
            .await?
            .ok_or_else(|| SaverError::NotFound("article".to_string()))
    }

    /// The most recent articles for the feed.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Article>> {
        ArticleRepository::new(self.db.pool())
            .list_recent(limit)
            .await
    }
}
