use anyhow::Result;
use chrono::Utc;
use tracing::{debug, error, info};

use hackpulse_common::Hackathon;
use hackpulse_store::RecordStore;

use crate::extractor::RecordExtractor;
use crate::filter;
use crate::rate_limit::RateLimiter;
use crate::scraper::ChannelFetcher;

/// Stats from one ingestion cycle.
#[derive(Debug, Default)]
pub struct CycleStats {
    pub channels_scraped: u32,
    pub channels_failed: u32,
    pub posts_seen: u32,
    pub posts_filtered: u32,
    pub extraction_failures: u32,
    pub duplicates_skipped: u32,
    pub records_stored: u32,
    pub store_failures: u32,
}

impl std::fmt::Display for CycleStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Ingestion Cycle Complete ===")?;
        writeln!(f, "Channels scraped:    {}", self.channels_scraped)?;
        writeln!(f, "Channels failed:     {}", self.channels_failed)?;
        writeln!(f, "Posts seen:          {}", self.posts_seen)?;
        writeln!(f, "Posts filtered:      {}", self.posts_filtered)?;
        writeln!(f, "Extraction failures: {}", self.extraction_failures)?;
        writeln!(f, "Duplicates skipped:  {}", self.duplicates_skipped)?;
        writeln!(f, "Records stored:      {}", self.records_stored)?;
        write!(f, "Store failures:      {}", self.store_failures)
    }
}

/// One sequential pass over all configured channels: fetch, filter, extract,
/// dedup, insert. No error here aborts the cycle; failures are logged and
/// the next channel or post is processed.
pub struct Ingestor {
    fetcher: Box<dyn ChannelFetcher>,
    extractor: Box<dyn RecordExtractor>,
    store: Box<dyn RecordStore>,
    limiter: Box<dyn RateLimiter>,
    channels: Vec<String>,
}

impl Ingestor {
    pub fn new(
        fetcher: Box<dyn ChannelFetcher>,
        extractor: Box<dyn RecordExtractor>,
        store: Box<dyn RecordStore>,
        limiter: Box<dyn RateLimiter>,
        channels: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            limiter,
            channels,
        }
    }

    pub async fn run_cycle(&self) -> CycleStats {
        let now = Utc::now();
        let today = now.date_naive();
        let cutoff = filter::retention_cutoff(now);
        let mut stats = CycleStats::default();

        for channel in &self.channels {
            let posts = match self.fetcher.fetch(channel).await {
                Ok(posts) => posts,
                Err(e) => {
                    error!(channel, error = %e, "Channel fetch failed, skipping channel");
                    stats.channels_failed += 1;
                    continue;
                }
            };
            stats.channels_scraped += 1;
            stats.posts_seen += posts.len() as u32;

            for post in posts {
                if !filter::is_relevant(&post.text) || !filter::is_fresh(&post, cutoff) {
                    debug!(channel, published_at = %post.published_at, "Post filtered");
                    stats.posts_filtered += 1;
                    continue;
                }

                match self.extractor.extract_post(&post, today).await {
                    Ok(Some(record)) => self.persist(channel, record, &mut stats).await,
                    Ok(None) => stats.extraction_failures += 1,
                    Err(e) => {
                        error!(channel, error = %e, "Extraction call failed, skipping post");
                        stats.extraction_failures += 1;
                    }
                }

                // Per-post pacing toward the generation service
                self.limiter.wait().await;
            }
        }

        stats
    }

    /// The dedup gate. Title is the identity key: an existing record with
    /// the same title means the same real-world event.
    async fn persist(&self, channel: &str, record: Hackathon, stats: &mut CycleStats) {
        match self.store.find_by_title(&record.title).await {
            Err(e) => {
                error!(channel, title = %record.title, error = %e, "Dedup lookup failed, abandoning record");
                stats.store_failures += 1;
            }
            Ok(Some(_)) => {
                info!(title = %record.title, "Record already exists, skipping");
                stats.duplicates_skipped += 1;
            }
            Ok(None) => match self.store.insert(&record).await {
                Ok(()) => {
                    info!(title = %record.title, "Stored new hackathon");
                    stats.records_stored += 1;
                }
                Err(e) => {
                    error!(title = %record.title, error = %e, "Insert failed");
                    stats.store_failures += 1;
                }
            },
        }
    }
}
