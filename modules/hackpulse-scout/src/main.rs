use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hackpulse_common::Config;
use hackpulse_scout::{
    channels,
    extractor::GeminiExtractor,
    ingest::Ingestor,
    rate_limit::FixedDelay,
    scheduler::Scheduler,
    scraper::TelegramScraper,
};
use hackpulse_store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("hackpulse_scout=info".parse()?),
        )
        .init();

    info!("HackPulse scout starting...");

    let config = Config::scout_from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = PgStore::new(pool);
    store.migrate().await?;

    let ingestor = Ingestor::new(
        Box::new(TelegramScraper::new()),
        Box::new(GeminiExtractor::new(&config.gemini_api_key)),
        Box::new(store),
        Box::new(FixedDelay::new(Duration::from_secs(config.extract_delay_secs))),
        channels::CHANNELS.iter().map(|s| s.to_string()).collect(),
    );

    info!(
        channels = channels::CHANNELS.len(),
        interval_hours = config.scrape_interval_hours,
        "Scheduler starting"
    );

    let scheduler = Scheduler::new(
        ingestor,
        Duration::from_secs(config.scrape_interval_hours * 3600),
    );
    scheduler.run().await;

    Ok(())
}
