use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ::scraper::{Html, Selector};
use tracing::info;

use hackpulse_common::{CandidatePost, PulseError};

/// Fetches candidate posts for one channel.
#[async_trait]
pub trait ChannelFetcher: Send + Sync {
    async fn fetch(&self, channel: &str) -> Result<Vec<CandidatePost>>;
}

/// Scraper for Telegram's public preview pages (`https://t.me/s/<channel>`).
/// No authentication; the preview markup carries the last ~20 posts.
pub struct TelegramScraper {
    client: reqwest::Client,
}

impl TelegramScraper {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for TelegramScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelFetcher for TelegramScraper {
    async fn fetch(&self, channel: &str) -> Result<Vec<CandidatePost>> {
        let url = format!("https://t.me/s/{channel}");
        info!(channel, "Fetching channel preview");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PulseError::Fetch(format!("{channel}: {e}")))?;

        if !response.status().is_success() {
            return Err(PulseError::Fetch(format!(
                "{channel}: status {}",
                response.status()
            ))
            .into());
        }

        let html = response
            .text()
            .await
            .map_err(|e| PulseError::Fetch(format!("{channel}: {e}")))?;

        let posts = parse_preview_page(&html);
        info!(channel, count = posts.len(), "Parsed channel preview");
        Ok(posts)
    }
}

/// Pull (text, publish timestamp) pairs out of the preview markup, in
/// document order. Blocks without a text body or a parseable `datetime`
/// attribute are media or service messages and are skipped silently.
pub fn parse_preview_page(html: &str) -> Vec<CandidatePost> {
    let message_sel = Selector::parse(".tgme_widget_message").expect("valid selector");
    let text_sel = Selector::parse(".tgme_widget_message_text").expect("valid selector");
    let time_sel = Selector::parse("time[datetime]").expect("valid selector");

    let document = Html::parse_document(html);
    let mut posts = Vec::new();

    for message in document.select(&message_sel) {
        let Some(text_el) = message.select(&text_sel).next() else {
            continue;
        };
        let text = text_el.text().collect::<Vec<_>>().join("\n");
        let text = text.trim().to_string();
        if text.is_empty() {
            continue;
        }

        let Some(datetime) = message
            .select(&time_sel)
            .next()
            .and_then(|t| t.value().attr("datetime"))
        else {
            continue;
        };
        let Ok(published_at) = DateTime::parse_from_rfc3339(datetime) else {
            continue;
        };

        posts.push(CandidatePost {
            text,
            published_at: published_at.with_timezone(&Utc),
        });
    }

    posts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> String {
        format!(r#"<div class="tgme_widget_message">{body}</div>"#)
    }

    #[test]
    fn extracts_text_and_timestamp_in_document_order() {
        let html = format!(
            "{}{}",
            message(
                r#"<div class="tgme_widget_message_text">First <b>hackathon</b> post</div>
                   <time datetime="2025-02-21T15:04:05+00:00"></time>"#
            ),
            message(
                r#"<div class="tgme_widget_message_text">Second post</div>
                   <time datetime="2025-02-22T10:00:00+00:00"></time>"#
            ),
        );

        let posts = parse_preview_page(&html);
        assert_eq!(posts.len(), 2);
        assert!(posts[0].text.contains("First"));
        assert!(posts[0].text.contains("hackathon"));
        assert!(posts[1].text.contains("Second"));
        assert!(posts[0].published_at < posts[1].published_at);
    }

    #[test]
    fn skips_blocks_without_text_body() {
        // Photo-only post: no message_text element
        let html = message(r#"<time datetime="2025-02-21T15:04:05+00:00"></time>"#);
        assert!(parse_preview_page(&html).is_empty());
    }

    #[test]
    fn skips_blocks_without_parseable_timestamp() {
        let missing = message(r#"<div class="tgme_widget_message_text">No time here</div>"#);
        assert!(parse_preview_page(&missing).is_empty());

        let malformed = message(
            r#"<div class="tgme_widget_message_text">Bad time</div>
               <time datetime="yesterday"></time>"#,
        );
        assert!(parse_preview_page(&malformed).is_empty());
    }

    #[test]
    fn timestamp_is_normalized_to_utc() {
        let html = message(
            r#"<div class="tgme_widget_message_text">Offset post</div>
               <time datetime="2025-02-21T20:00:00+05:00"></time>"#,
        );
        let posts = parse_preview_page(&html);
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].published_at,
            DateTime::parse_from_rfc3339("2025-02-21T15:00:00+00:00").unwrap()
        );
    }
}
