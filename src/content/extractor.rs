//! Readable article extraction.

use dom_smoothie::{Config, Readability};
use tracing::debug;

use crate::article::{ArticleMetadata, DEFAULT_TITLE};

/// Upper bound on elements the readability pass will look at.
const MAX_ELEMENTS_TO_PARSE: usize = 9000;

/// Article content extracted from a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedArticle {
    /// Title, or [`DEFAULT_TITLE`] when the page has none.
    pub title: String,
    /// Byline.
    pub author: Option<String>,
    /// Body HTML, unsanitized.
    pub content: String,
    /// Site name, date and description.
    pub metadata: ArticleMetadata,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extract the main article from `html`. `url` resolves relative links.
///
/// Returns `None` when the page cannot be parsed or has no readable body.
pub fn extract(html: &str, url: Option<&str>) -> Option<ExtractedArticle> {
    let cfg = Config {
        max_elements_to_parse: MAX_ELEMENTS_TO_PARSE,
        ..Default::default()
    };

    let mut readability = match Readability::new(html, url, Some(cfg)) {
        Ok(r) => r,
        Err(e) => {
            debug!("Readability setup failed: {}", e);
            return None;
        }
    };
    let article = match readability.parse() {
        Ok(a) => a,
        Err(e) => {
            debug!("Readability found no article: {}", e);
            return None;
        }
    };

    if article.text_content.trim().is_empty() {
        return None;
    }

    let title = non_empty(Some(article.title)).unwrap_or_else(|| DEFAULT_TITLE.to_string());

    Some(ExtractedArticle {
        title,
        author: non_empty(article.byline),
        content: article.content.to_string(),
        metadata: ArticleMetadata {
            site_name: non_empty(article.site_name),
            date: non_empty(article.published_time),
            description: non_empty(article.excerpt),
            ..Default::default()
        },
    })
}
