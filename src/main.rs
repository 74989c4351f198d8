use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use article_saver::{Config, ContentProcessor, Database, HttpFetcher, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to read .env: {e}");
        }
    }

    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    if let Err(e) = article_saver::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        article_saver::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    info!(
        "Article Saver {} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.environment.as_str()
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> article_saver::Result<()> {
    let db = Database::connect(&config.database.url, config.database.max_connections).await?;
    let fetcher = HttpFetcher::new(&config.fetcher)?;
    let processor = ContentProcessor::new(Arc::new(fetcher));

    WebServer::new(&config, db, processor)?.run().await
}
