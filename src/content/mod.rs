//! Content pipeline for Article Saver.
//!
//! Turns a submitted URL into a sanitized article body and its content hash.

pub mod extractor;
pub mod fetcher;
pub mod hasher;
pub mod processor;
pub mod sanitizer;

pub use extractor::{extract, ExtractedArticle};
pub use fetcher::{validate_url, HttpFetcher, PageFetcher};
pub use hasher::content_hash;
pub use processor::{ContentProcessor, ProcessOutcome, ProcessedArticle};
pub use sanitizer::{sanitize_html, ALLOWED_TAGS};
