//! Middleware for Web API.

pub mod api_key;
pub mod cors;

pub use api_key::{ApiKey, API_KEY_HEADER};
pub use cors::create_cors_layer;
