//! Article types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title used when extraction finds none.
pub const DEFAULT_TITLE: &str = "Untitled Article";

/// Default page size for article listings.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size for article listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Where an article came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Submitted as a URL and fetched.
    Url,
    /// Ingested from an email. Modeled but not produced yet.
    Email,
}

impl SourceType {
    /// Database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Url => "url",
            SourceType::Email => "email",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(SourceType::Url),
            "email" => Ok(SourceType::Email),
            other => Err(format!("unknown source type: {other}")),
        }
    }
}

/// Auxiliary metadata captured during extraction.
///
/// Open-ended: keys written by newer versions are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    /// Site name.
    pub site_name: Option<String>,
    /// Publication date as reported by the page.
    pub date: Option<String>,
    /// Short description or excerpt.
    pub description: Option<String>,
    /// Any other keys.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A stored article.
#[derive(Debug, Clone)]
pub struct Article {
    /// Article ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Author, if known.
    pub author: Option<String>,
    /// Original URL.
    pub source_url: Option<String>,
    /// Source type.
    pub source_type: SourceType,
    /// Sanitized HTML body.
    pub content: String,
    /// SHA-256 hex digest of `content`.
    pub content_hash: String,
    /// When the article was stored.
    pub created_at: DateTime<Utc>,
    /// Whether the article has been read.
    pub read_status: bool,
    /// Extraction metadata.
    pub extra_metadata: ArticleMetadata,
}

/// New article for creation.
#[derive(Debug, Clone)]
pub struct NewArticle {
    /// Title.
    pub title: String,
    /// Author.
    pub author: Option<String>,
    /// Original URL.
    pub source_url: Option<String>,
    /// Source type.
    pub source_type: SourceType,
    /// Sanitized HTML body.
    pub content: String,
    /// SHA-256 hex digest of `content`.
    pub content_hash: String,
    /// Extraction metadata.
    pub extra_metadata: ArticleMetadata,
}

impl NewArticle {
    /// Create a new URL-sourced article. An empty title becomes [`DEFAULT_TITLE`].
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        content_hash: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        };
        Self {
            title,
            author: None,
            source_url: None,
            source_type: SourceType::Url,
            content: content.into(),
            content_hash: content_hash.into(),
            extra_metadata: ArticleMetadata::default(),
        }
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the source URL.
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Set the source type.
    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    /// Set the metadata.
    pub fn with_metadata(mut self, metadata: ArticleMetadata) -> Self {
        self.extra_metadata = metadata;
        self
    }
}

/// Listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Rows to skip.
    pub skip: i64,
    /// Maximum rows to return.
    pub limit: i64,
    /// Only unread articles.
    pub unread_only: bool,
}

impl ArticleQuery {
    /// Create a query, clamping `skip` to >= 0 and `limit` to 1..=MAX_PAGE_SIZE.
    pub fn new(skip: i64, limit: i64, unread_only: bool) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
            unread_only,
        }
    }
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, false)
    }
}
