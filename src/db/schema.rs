//! Database schema and migrations.
//!
//! Each backend carries its own migration list. Migrations are applied in
//! order and recorded in the `schema_version` table.

/// Database migrations (SQLite).
#[cfg(feature = "sqlite")]
pub const MIGRATIONS: &[&str] = &[
    // v1: articles and sources
    r#"
CREATE TABLE articles (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    author          TEXT,
    source_url      TEXT,
    source_type     TEXT NOT NULL DEFAULT 'url',   -- 'url' or 'email'
    content         TEXT NOT NULL,                 -- sanitized HTML
    content_hash    TEXT NOT NULL,                 -- SHA-256 hex, dedup key
    created_at      TEXT NOT NULL,
    read_status     BOOLEAN NOT NULL DEFAULT 0,
    extra_metadata  TEXT                           -- JSON
);

CREATE UNIQUE INDEX idx_articles_content_hash ON articles(content_hash);
CREATE INDEX idx_articles_created_at ON articles(created_at);
CREATE INDEX idx_articles_read_status ON articles(read_status);
CREATE INDEX idx_articles_source_type ON articles(source_type);

CREATE TABLE sources (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    domain            TEXT NOT NULL UNIQUE,
    source_type       TEXT NOT NULL,
    processing_rules  TEXT,                        -- JSON
    created_at        TEXT NOT NULL
);
"#,
];

/// Database migrations (PostgreSQL).
#[cfg(feature = "postgres")]
pub const MIGRATIONS: &[&str] = &[
    // v1: articles and sources
    r#"
CREATE TABLE articles (
    id              BIGSERIAL PRIMARY KEY,
    title           VARCHAR(500) NOT NULL,
    author          VARCHAR(200),
    source_url      TEXT,
    source_type     VARCHAR(20) NOT NULL DEFAULT 'url',
    content         TEXT NOT NULL,
    content_hash    VARCHAR(64) NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    read_status     BOOLEAN NOT NULL DEFAULT FALSE,
    extra_metadata  JSONB
);

CREATE UNIQUE INDEX idx_articles_content_hash ON articles(content_hash);
CREATE INDEX idx_articles_created_at ON articles(created_at);
CREATE INDEX idx_articles_read_status ON articles(read_status);
CREATE INDEX idx_articles_source_type ON articles(source_type);

CREATE TABLE sources (
    id                BIGSERIAL PRIMARY KEY,
    domain            VARCHAR(255) NOT NULL UNIQUE,
    source_type       VARCHAR(20) NOT NULL,
    processing_rules  JSONB,
    created_at        TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#,
];

/// DDL for the migration bookkeeping table.
#[cfg(feature = "sqlite")]
pub const SCHEMA_VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
)";

/// DDL for the migration bookkeeping table.
#[cfg(feature = "postgres")]
pub const SCHEMA_VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    version     BIGINT PRIMARY KEY,
    applied_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_first_migration_creates_tables() {
        let first = MIGRATIONS[0];
        assert!(first.contains("CREATE TABLE articles"));
        assert!(first.contains("CREATE TABLE sources"));
        assert!(first.contains("CREATE UNIQUE INDEX idx_articles_content_hash"));
    }

    #[test]
    fn test_articles_indexes_declared() {
        let first = MIGRATIONS[0];
        assert!(first.contains("idx_articles_created_at"));
        assert!(first.contains("idx_articles_read_status"));
        assert!(first.contains("idx_articles_source_type"));
    }
}
