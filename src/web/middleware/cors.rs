//! CORS middleware configuration.

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use super::api_key::API_KEY_HEADER;

/// Create a CORS layer from the configured origins.
///
/// An empty list or `*` allows any origin without credentials.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PATCH, Method::OPTIONS];

    let permissive = || {
        CorsLayer::new()
            .allow_methods(methods.clone())
            .allow_headers(Any)
            .allow_origin(Any)
    };

    if origins.is_empty() || origins.iter().any(|o| o.trim() == "*") {
        return permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| o.trim().parse().ok())
        .collect();

    if parsed_origins.is_empty() {
        tracing::warn!("No valid CORS origins configured, allowing any origin");
        return permissive();
    }

    CorsLayer::new()
        .allow_methods(methods)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .allow_credentials(true)
        .allow_origin(parsed_origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn app(origins: &[String]) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(create_cors_layer(origins))
    }

    async fn allow_origin(origins: &[String], origin: &str) -> Option<String> {
        let response = app(origins)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("origin", origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_wildcard_allows_any_origin() {
        let origins = vec!["*".to_string()];
        assert_eq!(
            allow_origin(&origins, "https://reader.test").await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn test_explicit_origins() {
        let origins = vec!["https://reader.test".to_string()];
        assert_eq!(
            allow_origin(&origins, "https://reader.test").await.as_deref(),
            Some("https://reader.test")
        );
        assert_eq!(allow_origin(&origins, "https://evil.test").await, None);
    }

    #[test]
    fn test_empty_origins() {
        let _layer = create_cors_layer(&[]);
    }
}
