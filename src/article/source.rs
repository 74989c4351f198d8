//! Source domain tracking.
//!
//! One row per submitted domain, with room for per-domain processing rules.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tracing::warn;

use super::types::SourceType;
use crate::db::DbPool;
use crate::Result;

/// A tracked source domain.
#[derive(Debug, Clone)]
pub struct Source {
    /// Source ID.
    pub id: i64,
    /// Domain (host, with port if non-default).
    pub domain: String,
    /// Source type.
    pub source_type: SourceType,
    /// Free-form processing rules.
    pub processing_rules: Option<serde_json::Value>,
    /// When the domain was first seen.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct SourceRow {
    id: i64,
    domain: String,
    source_type: String,
    processing_rules: Option<Json<serde_json::Value>>,
    created_at: DateTime<Utc>,
}

impl From<SourceRow> for Source {
    fn from(row: SourceRow) -> Self {
        let source_type = row.source_type.parse().unwrap_or_else(|e| {
            warn!(source_id = row.id, "{}; treating as url", e);
            SourceType::Url
        });
        Source {
            id: row.id,
            domain: row.domain,
            source_type,
            processing_rules: row.processing_rules.map(|j| j.0),
            created_at: row.created_at,
        }
    }
}

/// Extract the domain of a URL, as stored in `sources.domain`.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}

/// Repository for source operations.
pub struct SourceRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SourceRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Record a domain, keeping the existing row if it is already known.
    pub async fn record(&self, domain: &str, source_type: SourceType) -> Result<Source> {
        sqlx::query(
            r#"
            INSERT INTO sources (domain, source_type, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (domain) DO NOTHING
            "#,
        )
        .bind(domain)
        .bind(source_type.as_str())
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        self.get_by_domain(domain)
            .await?
            .ok_or_else(|| crate::SaverError::NotFound(format!("source {domain}")))
    }

    /// Get a source by domain.
    pub async fn get_by_domain(&self, domain: &str) -> Result<Option<Source>> {
        let row = sqlx::query_as::<_, SourceRow>(
            r#"
            SELECT id, domain, source_type, processing_rules, created_at
            FROM sources
            WHERE domain = $1
            "#,
        )
        .bind(domain)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Source::from))
    }

    /// List all sources, oldest first.
    pub async fn list(&self) -> Result<Vec<Source>> {
        let rows = sqlx::query_as::<_, SourceRow>(
            r#"
            SELECT id, domain, source_type, processing_rules, created_at
            FROM sources
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Source::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of() {
        assert_eq!(
            domain_of("https://Example.com/a/b?c=d").as_deref(),
            Some("example.com")
        );
        assert_eq!(
            domain_of("http://localhost:8080/x").as_deref(),
            Some("localhost:8080")
        );
        assert_eq!(domain_of("not a url"), None);
        assert_eq!(domain_of("mailto:someone@example.com"), None);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_record_is_idempotent() {
        let db = crate::Database::open_in_memory().await.unwrap();
        let repo = SourceRepository::new(db.pool());

        let first = repo.record("example.com", SourceType::Url).await.unwrap();
        let second = repo.record("example.com", SourceType::Url).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.source_type, SourceType::Url);
        assert!(first.processing_rules.is_none());
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_get_by_domain_missing() {
        let db = crate::Database::open_in_memory().await.unwrap();
        let repo = SourceRepository::new(db.pool());
        assert!(repo.get_by_domain("nowhere.test").await.unwrap().is_none());
    }
}
