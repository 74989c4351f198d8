//! API handlers.

pub mod articles;
pub mod feed;
pub mod info;

pub use articles::*;
pub use feed::*;
pub use info::*;

use crate::config::{Config, Environment, FeedConfig};
use crate::content::ContentProcessor;
use crate::Database;

/// Application name reported by the info endpoint.
pub const APP_NAME: &str = "Article Saver API";

/// Shared application state.
pub struct AppState {
    /// Database.
    pub db: Database,
    /// Content pipeline.
    pub processor: ContentProcessor,
    /// Feed settings.
    pub feed: FeedConfig,
    /// Configured API key. `None` rejects every protected request.
    pub api_key: Option<String>,
    /// Deployment environment.
    pub environment: Environment,
}

impl AppState {
    /// Create application state from configuration.
    pub fn new(db: Database, processor: ContentProcessor, config: &Config) -> Self {
        let api_key = Some(config.auth.api_key.clone()).filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!("No API key configured; article submission is disabled");
        }
        Self {
            db,
            processor,
            feed: config.feed.clone(),
            api_key,
            environment: config.environment,
        }
    }
}
