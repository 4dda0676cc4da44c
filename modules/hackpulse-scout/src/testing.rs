//! Hand-rolled mocks for the pipeline seams. Deterministic tests with no
//! network and no database.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use hackpulse_common::{CandidatePost, Hackathon, PulseError, Status};
use hackpulse_store::RecordStore;

use crate::extractor::RecordExtractor;
use crate::scraper::ChannelFetcher;
use crate::search::WebSearcher;

pub(crate) fn record(title: &str) -> Hackathon {
    Hackathon {
        id: None,
        title: title.to_string(),
        date: "sometime".to_string(),
        deadline: None,
        format: "ОНЛАЙН".to_string(),
        city: None,
        age_limit: String::new(),
        link: None,
        status: Status::Live,
        created_at: None,
    }
}

// --- ChannelFetcher ---

#[derive(Default)]
pub(crate) struct MockFetcher {
    pub posts: HashMap<String, Vec<CandidatePost>>,
    pub fail_channels: HashSet<String>,
    pub calls: Arc<AtomicUsize>,
}

impl MockFetcher {
    pub fn with_channel(mut self, channel: &str, posts: Vec<CandidatePost>) -> Self {
        self.posts.insert(channel.to_string(), posts);
        self
    }

    pub fn failing(mut self, channel: &str) -> Self {
        self.fail_channels.insert(channel.to_string());
        self
    }
}

#[async_trait]
impl ChannelFetcher for MockFetcher {
    async fn fetch(&self, channel: &str) -> Result<Vec<CandidatePost>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_channels.contains(channel) {
            return Err(PulseError::Fetch(format!("{channel}: connection refused")).into());
        }
        Ok(self.posts.get(channel).cloned().unwrap_or_default())
    }
}

// --- RecordExtractor ---

/// Extracts the post text itself as the record title, so tests control
/// dedup identity through the fixture text. Posts containing "INVALID"
/// simulate an unparseable model response (`Ok(None)`); `fail` simulates a
/// transport error on every call.
#[derive(Default)]
pub(crate) struct MockExtractor {
    pub calls: Arc<AtomicUsize>,
    pub fail: bool,
    pub snippet_records: Vec<Hackathon>,
    pub contexts: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl RecordExtractor for MockExtractor {
    async fn extract_post(
        &self,
        post: &CandidatePost,
        _today: NaiveDate,
    ) -> Result<Option<Hackathon>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow::anyhow!("generation service unavailable"));
        }
        if post.text.contains("INVALID") {
            return Ok(None);
        }
        Ok(Some(record(&post.text)))
    }

    async fn extract_snippets(
        &self,
        _query: &str,
        context: &str,
        _today: NaiveDate,
    ) -> Result<Vec<Hackathon>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow::anyhow!("generation service unavailable"));
        }
        self.contexts.lock().unwrap().push(context.to_string());
        Ok(self.snippet_records.clone())
    }
}

// --- RecordStore ---

#[derive(Default)]
pub(crate) struct MemoryStore {
    pub records: Arc<Mutex<Vec<Hackathon>>>,
    pub fail_lookup: bool,
    pub fail_insert: bool,
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_by_title(&self, title: &str) -> Result<Option<Hackathon>, PulseError> {
        if self.fail_lookup {
            return Err(PulseError::Database("lookup failed".to_string()));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.title == title)
            .cloned())
    }

    async fn insert(&self, r: &Hackathon) -> Result<(), PulseError> {
        if self.fail_insert {
            return Err(PulseError::Database("insert failed".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let mut stored = r.clone();
        stored.id = Some(records.len() as i64 + 1);
        stored.created_at = Some(Utc::now());
        records.push(stored);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Hackathon>, PulseError> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn search(&self, query: &str) -> Result<Vec<Hackathon>, PulseError> {
        let needle = query.to_lowercase();
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.title.to_lowercase().contains(&needle)
                    || r.city
                        .as_deref()
                        .map(|c| c.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}

// --- WebSearcher ---

#[derive(Default)]
pub(crate) struct MockSearcher {
    pub snippets: Vec<String>,
    pub calls: Arc<AtomicUsize>,
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, _query: &str, _max_results: u32) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.snippets.clone())
    }
}
