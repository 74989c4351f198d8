//! RSS feed publishing for Article Saver.

pub mod renderer;

pub use renderer::{FeedRenderer, RSS_CONTENT_TYPE};
