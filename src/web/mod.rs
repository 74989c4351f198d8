//! Web API module for Article Saver.
//!
//! This module provides the REST API: article submission and listing, the
//! RSS feed and service info.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
