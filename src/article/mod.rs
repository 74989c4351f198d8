//! Article storage for Article Saver.
//!
//! This module provides the article and source models, their repositories
//! and the submission service.

pub mod repository;
pub mod service;
pub mod source;
pub mod types;

pub use repository::ArticleRepository;
pub use service::{ArticleList, ArticleService};
pub use source::{domain_of, Source, SourceRepository};
pub use types::{
    Article, ArticleMetadata, ArticleQuery, NewArticle, SourceType, DEFAULT_PAGE_SIZE,
    DEFAULT_TITLE, MAX_PAGE_SIZE,
};
