//! Relevance and freshness gates. Pure and stateless; posts failing a gate
//! are dropped, never counted as errors.

use chrono::{DateTime, Duration, Utc};

use hackpulse_common::CandidatePost;

/// Topical markers a post must mention to be worth an extraction call.
pub const KEYWORDS: &[&str] = &["хакатон", "hackathon"];

/// Posts older than this are ignored even when they match a keyword.
/// Roughly two calendar months.
pub const RETENTION_DAYS: i64 = 62;

/// Case-insensitive substring match against the keyword vocabulary.
pub fn is_relevant(text: &str) -> bool {
    let lower = text.to_lowercase();
    KEYWORDS.iter().any(|k| lower.contains(k))
}

/// The publish timestamp before which posts are considered stale.
pub fn retention_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RETENTION_DAYS)
}

pub fn is_fresh(post: &CandidatePost, cutoff: DateTime<Utc>) -> bool {
    post.published_at >= cutoff
}
