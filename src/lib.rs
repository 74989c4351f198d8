//! Article Saver - a personal read-it-later service.
//!
//! Submitted URLs are fetched, reduced to their readable article content,
//! sanitized, deduplicated by content hash and republished as an RSS feed.

pub mod article;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod feed;
pub mod logging;
pub mod web;

pub use article::{Article, ArticleRepository, ArticleService, NewArticle, SourceType};
pub use config::Config;
pub use content::{ContentProcessor, HttpFetcher, PageFetcher};
pub use db::Database;
pub use error::{Result, SaverError};
pub use feed::FeedRenderer;
pub use web::WebServer;
