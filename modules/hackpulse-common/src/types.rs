use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A raw announcement lifted from a channel preview page. Lives only within
/// one ingestion cycle.
#[derive(Debug, Clone)]
pub struct CandidatePost {
    pub text: String,
    pub published_at: DateTime<Utc>,
}

/// Whether an event can still be entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "LIVE")]
    Live,
    #[serde(rename = "DEAD")]
    Dead,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Live => "LIVE",
            Status::Dead => "DEAD",
        }
    }

    /// Parse a status string. Anything that is not explicitly DEAD is treated
    /// as LIVE; the read-time refresh corrects optimistic statuses anyway.
    pub fn parse(s: &str) -> Status {
        match s {
            "DEAD" => Status::Dead,
            _ => Status::Live,
        }
    }
}

/// Human date descriptions matching this pattern belong to records written
/// before deadline tracking existed and are known stale. Dates are stored in
/// Russian, hence the Russian month form. Compatibility shim; do not extend
/// the pattern.
const LEGACY_STALE_PATTERN: &str = "февраля 2026";

/// A structured event record. Title is the sole identity key: two records
/// with the same title are the same real-world event. Immutable once
/// persisted, except for `status` which is recomputed whenever records are
/// served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hackathon {
    /// Assigned by the store on insert.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    /// Human-readable date description in Russian, e.g. "21-22 марта 2025".
    pub date: String,
    /// Registration deadline, when the announcement states one.
    pub deadline: Option<NaiveDate>,
    pub format: String,
    pub city: Option<String>,
    pub age_limit: String,
    pub link: Option<String>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Hackathon {
    /// Recompute `status` from the deadline relative to `today`. Runs at read
    /// time as well as before insert, so statuses stay correct as the clock
    /// advances past deadlines of records written long ago. Idempotent.
    pub fn refresh_status(&mut self, today: NaiveDate) {
        match self.deadline {
            Some(deadline) => {
                // Deadlines carry no time of day, so on the deadline date
                // itself registration is already treated as closed.
                self.status = if deadline <= today {
                    Status::Dead
                } else {
                    Status::Live
                };
            }
            None => {
                if self.date.contains(LEGACY_STALE_PATTERN) {
                    self.status = Status::Dead;
                }
                // Otherwise keep whatever status the extraction produced.
            }
        }
    }
}
