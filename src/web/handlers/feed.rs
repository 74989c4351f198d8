//! RSS feed handler.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::debug;

use crate::article::ArticleService;
use crate::feed::{FeedRenderer, RSS_CONTENT_TYPE};
use crate::web::handlers::AppState;

/// GET /rss - The most recent articles as RSS 2.0.
///
/// Always answers 200 with a well-formed document; failures are reported
/// inside an error channel.
pub async fn rss_feed(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let base_url = state
        .feed
        .public_url
        .clone()
        .unwrap_or_else(|| base_url_from_headers(&headers));
    let renderer = FeedRenderer::new(&state.feed, base_url);

    let service = ArticleService::new(&state.db, &state.processor);
    let body = renderer.render_or_fallback(service.recent(state.feed.limit).await);

    ([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], body)
}

/// Base URL used when the `Host` header is missing or unusable.
const FALLBACK_BASE_URL: &str = "http://localhost";

/// Derive the public base URL from the request's `Host` header.
///
/// A header that does not form a valid URL falls back to
/// `http://localhost`.
pub fn base_url_from_headers(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .filter(|p| matches!(*p, "http" | "https"))
        .unwrap_or("http");

    let candidate = format!("{scheme}://{host}");
    match url::Url::parse(&candidate) {
        Ok(parsed) if parsed.host_str().is_some() && parsed.path() == "/" => candidate,
        _ => {
            debug!(host, "Ignoring unusable Host header for feed links");
            FALLBACK_BASE_URL.to_string()
        }
    }
}
