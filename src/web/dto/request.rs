//! Request DTOs for Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::http_scheme;
use crate::article::{ArticleQuery, DEFAULT_PAGE_SIZE};

/// Article submission request.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    /// URL of the page to save.
    #[validate(
        url(message = "Must be a valid URL"),
        custom(function = "http_scheme")
    )]
    pub url: String,
}

/// Query parameters for listing articles.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Rows to skip.
    #[serde(default)]
    pub skip: Option<i64>,
    /// Page size, clamped to 1..=100.
    #[serde(default)]
    pub limit: Option<i64>,
    /// Only unread articles.
    #[serde(default)]
    pub unread_only: Option<bool>,
}

impl ListQuery {
    /// Convert to a clamped repository query.
    pub fn to_query(&self) -> ArticleQuery {
        ArticleQuery::new(
            self.skip.unwrap_or(0),
            self.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            self.unread_only.unwrap_or(false),
        )
    }
}

/// Read status update.
#[derive(Debug, Deserialize, Validate)]
pub struct ReadStatusUpdate {
    /// New read status.
    pub read_status: bool,
}
