use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use newsdesk::{utils, CommentRepository, Database, NewsRepository, Settings, SqliteDatabase};

fn main() -> Result<()> {
    // Set up logging
    env_logger::init();
    info!("Starting newsdesk...");

    let settings = Settings::load()?;
    let database_path = &settings.database.path;

    // Ensure the data directory exists before trying to open the database file
    utils::ensure_directory_exists(database_path)?;

    info!("Initializing database...");
    let database = SqliteDatabase::open(database_path)?;
    let database: Arc<dyn Database> = Arc::new(database);

    // The news repository owns the comment repository for cascading deletes
    let news_repository = NewsRepository::new(database.clone(), CommentRepository::new(database));

    let news = news_repository.list_news();
    if news.is_empty() {
        warn!("No news found in {}. Nothing to display.", database_path.display());
        return Ok(());
    }

    let comments = news_repository.comments().list_comments();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    utils::write_news_listing(&mut out, &news, &comments).context("Failed to write news listing")?;
    out.flush()?;

    Ok(())
}
