//! Ad-hoc extraction: answer a user query from live web-search snippets.
//! No dedup, no persistence; results go straight back to the caller.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use hackpulse_common::Hackathon;

use crate::extractor::RecordExtractor;

/// Scoping phrase prepended to every user query before it hits the search
/// provider.
pub const SEARCH_SCOPE: &str = "Hackathons and IT events in Kazakhstan";

/// Bounded result count per search call.
pub const MAX_SEARCH_RESULTS: u32 = 5;

#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Return up to `max_results` text snippets for a query.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<String>>;
}

// --- Tavily ---

pub struct TavilySearcher {
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct TavilySearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'static str,
    include_answer: bool,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    content: String,
}

impl TavilySearcher {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl WebSearcher for TavilySearcher {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<String>> {
        info!(query, max_results, "Tavily search");

        let request = TavilySearchRequest {
            api_key: &self.api_key,
            query,
            search_depth: "advanced",
            include_answer: false,
            max_results,
        };

        let response = self
            .client
            .post("https://api.tavily.com/search")
            .json(&request)
            .send()
            .await
            .context("Tavily API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Tavily API error ({status}): {body}");
        }

        let data: TavilySearchResponse = response
            .json()
            .await
            .context("Failed to parse Tavily response")?;

        let snippets: Vec<String> = data.results.into_iter().map(|r| r.content).collect();
        info!(query, count = snippets.len(), "Tavily search complete");
        Ok(snippets)
    }
}

// --- Pipeline ---

/// query → web search → one batched extraction call → records.
pub struct AdHocSearch {
    searcher: Box<dyn WebSearcher>,
    extractor: Box<dyn RecordExtractor>,
}

impl AdHocSearch {
    pub fn new(searcher: Box<dyn WebSearcher>, extractor: Box<dyn RecordExtractor>) -> Self {
        Self { searcher, extractor }
    }

    pub async fn run(&self, query: &str, today: NaiveDate) -> Result<Vec<Hackathon>> {
        let scoped = format!("{SEARCH_SCOPE} {query}");
        let snippets = self.searcher.search(&scoped, MAX_SEARCH_RESULTS).await?;

        if snippets.is_empty() {
            info!(query, "No web results, skipping extraction");
            return Ok(Vec::new());
        }

        let mut context = String::new();
        for (i, snippet) in snippets.iter().enumerate() {
            context.push_str(&format!("\n--- РЕЗУЛЬТАТ {} ---\n{}", i + 1, snippet));
        }

        let records = self.extractor.extract_snippets(query, &context, today).await?;
        info!(query, count = records.len(), "Ad-hoc search complete");
        Ok(records)
    }
}
