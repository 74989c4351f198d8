//! Validation utilities for Web API DTOs.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A JSON extractor that validates the request body.
///
/// Malformed JSON is a 400; a body that parses but has missing or mistyped
/// fields, or fails validation, is a 422 with field-level details.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::UNPROCESSABLE_ENTITY {
                ApiError::unprocessable(e.body_text())
            } else {
                ApiError::bad_request(format!("Invalid JSON: {}", e.body_text()))
            }
        })?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Validate that a URL uses http or https.
pub fn http_scheme(value: &str) -> Result<(), validator::ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(validator::ValidationError::new("http_scheme")
            .with_message("Must be an http or https URL".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_scheme() {
        assert!(http_scheme("https://example.com/a").is_ok());
        assert!(http_scheme("http://example.com").is_ok());
        assert!(http_scheme("ftp://example.com").is_err());
        assert!(http_scheme("mailto:a@example.com").is_err());
        assert!(http_scheme("example.com").is_err());
    }
}
