//! Response DTOs for Web API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::article::{Article, ArticleMetadata, SourceType};

/// Article summary, returned by submit and list.
#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    /// Article ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Author.
    pub author: Option<String>,
    /// Original URL.
    pub source_url: Option<String>,
    /// Source type.
    pub source_type: SourceType,
    /// When the article was saved.
    pub created_at: DateTime<Utc>,
    /// Whether the article has been read.
    pub read_status: bool,
}

impl From<&Article> for ArticleSummary {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            author: article.author.clone(),
            source_url: article.source_url.clone(),
            source_type: article.source_type,
            created_at: article.created_at,
            read_status: article.read_status,
        }
    }
}

/// Full article.
#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    /// Summary fields.
    #[serde(flatten)]
    pub summary: ArticleSummary,
    /// Sanitized HTML body.
    pub content: String,
    /// SHA-256 hex of the body.
    pub content_hash: String,
    /// Extraction metadata.
    pub extra_metadata: ArticleMetadata,
}

impl From<Article> for ArticleDetail {
    fn from(article: Article) -> Self {
        Self {
            summary: ArticleSummary::from(&article),
            content: article.content,
            content_hash: article.content_hash,
            extra_metadata: article.extra_metadata,
        }
    }
}

/// Article listing page.
#[derive(Debug, Serialize)]
pub struct ArticleListResponse {
    /// Articles, newest first.
    pub articles: Vec<ArticleSummary>,
    /// Rows skipped.
    pub skip: i64,
    /// Page size after clamping.
    pub limit: i64,
    /// Articles matching the filter.
    pub total: i64,
}

/// Service information.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Deployment environment.
    pub environment: String,
}
