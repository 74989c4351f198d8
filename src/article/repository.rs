//! Article repository.
//!
//! The unique index on `content_hash` is the authority for deduplication:
//! a conflicting insert is rolled back and the existing row is returned.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::QueryBuilder;
use tracing::{debug, info, warn};

use super::types::{Article, ArticleMetadata, ArticleQuery, NewArticle, SourceType};
use crate::db::{DbBackend, DbPool};
use crate::{Result, SaverError};

const ARTICLE_COLUMNS: &str = "id, title, author, source_url, source_type, content, \
                               content_hash, created_at, read_status, extra_metadata";

/// Row type for article from database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    author: Option<String>,
    source_url: Option<String>,
    source_type: String,
    content: String,
    content_hash: String,
    created_at: DateTime<Utc>,
    read_status: bool,
    extra_metadata: Option<Json<ArticleMetadata>>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        let source_type = row.source_type.parse().unwrap_or_else(|e| {
            warn!(article_id = row.id, "{}; treating as url", e);
            SourceType::Url
        });
        Article {
            id: row.id,
            title: row.title,
            author: row.author,
            source_url: row.source_url,
            source_type,
            content: row.content,
            content_hash: row.content_hash,
            created_at: row.created_at,
            read_status: row.read_status,
            extra_metadata: row.extra_metadata.map(|j| j.0).unwrap_or_default(),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Repository for article operations.
pub struct ArticleRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ArticleRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Store an article unless one with the same content hash exists.
    ///
    /// Returns the stored or pre-existing article and `true` if it was newly
    /// created.
    pub async fn create_or_get(&self, article: &NewArticle) -> Result<(Article, bool)> {
        if let Some(existing) = self.get_by_hash(&article.content_hash).await? {
            debug!(
                article_id = existing.id,
                "Content already stored, returning existing article"
            );
            return Ok((existing, false));
        }

        self.insert_or_existing(article).await
    }

    /// Insert an article, resolving a content hash conflict by reading back
    /// the row that won.
    ///
    /// # Errors
    ///
    /// Returns [`SaverError::Conflict`] if the insert hit the unique index
    /// but the conflicting row cannot be read back.
    pub async fn insert_or_existing(&self, article: &NewArticle) -> Result<(Article, bool)> {
        let mut tx = self.pool.begin().await?;

        let inserted: std::result::Result<i64, sqlx::Error> = sqlx::query_scalar(
            r#"
            INSERT INTO articles (title, author, source_url, source_type, content,
                                  content_hash, created_at, read_status, extra_metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&article.title)
        .bind(&article.author)
        .bind(&article.source_url)
        .bind(article.source_type.as_str())
        .bind(&article.content)
        .bind(&article.content_hash)
        .bind(Utc::now())
        .bind(false)
        .bind(Json(&article.extra_metadata))
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(id) => {
                tx.commit().await?;
                info!(article_id = id, title = %article.title, "Stored new article");
                let created = self
                    .get_by_id(id)
                    .await?
                    .ok_or_else(|| SaverError::NotFound("article".into()))?;
                Ok((created, true))
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                info!(
                    content_hash = %article.content_hash,
                    "Concurrent insert of identical content, reading existing article"
                );
                match self.get_by_hash(&article.content_hash).await? {
                    Some(existing) => Ok((existing, false)),
                    None => Err(SaverError::Conflict(
                        "article with identical content could not be stored".to_string(),
                    )),
                }
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e.into())
            }
        }
    }

    /// Get an article by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Article::from))
    }

    /// Get an article by content hash.
    pub async fn get_by_hash(&self, content_hash: &str) -> Result<Option<Article>> {
        let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE content_hash = $1");
        let row = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(content_hash)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Article::from))
    }

    /// List articles, newest first.
    pub async fn list(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let mut builder =
            QueryBuilder::<DbBackend>::new(format!("SELECT {ARTICLE_COLUMNS} FROM articles"));
        if query.unread_only {
            builder.push(" WHERE read_status = ").push_bind(false);
        }
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.skip);

        let rows = builder
            .build_query_as::<ArticleRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Count articles matching the filter, ignoring pagination.
    pub async fn count(&self, unread_only: bool) -> Result<i64> {
        let mut builder = QueryBuilder::<DbBackend>::new("SELECT COUNT(*) FROM articles");
        if unread_only {
            builder.push(" WHERE read_status = ").push_bind(false);
        }

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// The `limit` most recent articles, newest first.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Article>> {
        let query = format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, ArticleRow>(&query)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Article::from).collect())
    }

    /// Set the read status. Returns the updated article, or `None` if absent.
    pub async fn set_read_status(&self, id: i64, read: bool) -> Result<Option<Article>> {
        let result = sqlx::query("UPDATE articles SET read_status = $1 WHERE id = $2")
            .bind(read)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }
}
