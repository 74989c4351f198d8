//! API key authentication.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that admits only requests carrying the configured API key.
///
/// The key is read from `x-api-key` or an `Authorization: Bearer` header.
/// When the server has no key configured every request is rejected.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.api_key.as_deref() else {
            tracing::warn!("Rejecting request: no API key configured");
            return Err(ApiError::unauthorized("Invalid or missing API key"));
        };

        match presented_key(&parts.headers) {
            Some(presented) if keys_match(expected, presented) => Ok(ApiKey),
            Some(_) => {
                tracing::debug!("Rejecting request: API key mismatch");
                Err(ApiError::unauthorized("Invalid or missing API key"))
            }
            None => Err(ApiError::unauthorized("Invalid or missing API key")),
        }
    }
}

/// The key presented by the client, if any.
pub fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        return Some(key);
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|k| !k.is_empty())
}

/// Compare keys without short-circuiting on the first differing byte.
fn keys_match(expected: &str, presented: &str) -> bool {
    let a = Sha256::digest(expected.as_bytes());
    let b = Sha256::digest(presented.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
