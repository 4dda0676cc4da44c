//! Postgres persistence for hackathon records.
//!
//! The pipeline talks to the store through the [`RecordStore`] trait so the
//! ingestion cycle can be tested against an in-memory mock: no network, no
//! database, no Docker.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use hackpulse_common::{Hackathon, PulseError, Status};

/// Store operations the pipeline and the read path need. The ingestion side
/// only ever looks up and inserts; nothing updates or deletes.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Find a record with exactly this title.
    async fn find_by_title(&self, title: &str) -> Result<Option<Hackathon>, PulseError>;

    /// Insert a new record.
    async fn insert(&self, record: &Hackathon) -> Result<(), PulseError>;

    /// All records, oldest first.
    async fn list(&self) -> Result<Vec<Hackathon>, PulseError>;

    /// Records whose title or city contains `query`, case-insensitively.
    async fn search(&self, query: &str) -> Result<Vec<Hackathon>, PulseError>;
}

/// A row from the hackathons table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct HackathonRow {
    id: i64,
    title: String,
    date: String,
    deadline: Option<NaiveDate>,
    format: String,
    city: Option<String>,
    age_limit: String,
    link: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<HackathonRow> for Hackathon {
    fn from(row: HackathonRow) -> Self {
        Hackathon {
            id: Some(row.id),
            title: row.title,
            date: row.date,
            deadline: row.deadline,
            format: row.format,
            city: row.city,
            age_limit: row.age_limit,
            link: row.link,
            status: Status::parse(&row.status),
            created_at: Some(row.created_at),
        }
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations. Idempotent; both binaries run this
    /// at startup.
    pub async fn migrate(&self) -> Result<(), PulseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PulseError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn find_by_title(&self, title: &str) -> Result<Option<Hackathon>, PulseError> {
        let row = sqlx::query_as::<_, HackathonRow>(
            r#"
            SELECT id, title, date, deadline, format, city, age_limit, link, status, created_at
            FROM hackathons
            WHERE title = $1
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PulseError::Database(e.to_string()))?;

        Ok(row.map(Hackathon::from))
    }

    async fn insert(&self, record: &Hackathon) -> Result<(), PulseError> {
        sqlx::query(
            r#"
            INSERT INTO hackathons (title, date, deadline, format, city, age_limit, link, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&record.title)
        .bind(&record.date)
        .bind(record.deadline)
        .bind(&record.format)
        .bind(&record.city)
        .bind(&record.age_limit)
        .bind(&record.link)
        .bind(record.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| PulseError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Hackathon>, PulseError> {
        let rows = sqlx::query_as::<_, HackathonRow>(
            r#"
            SELECT id, title, date, deadline, format, city, age_limit, link, status, created_at
            FROM hackathons
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PulseError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Hackathon::from).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Hackathon>, PulseError> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query_as::<_, HackathonRow>(
            r#"
            SELECT id, title, date, deadline, format, city, age_limit, link, status, created_at
            FROM hackathons
            WHERE title ILIKE $1 OR city ILIKE $1
            ORDER BY id
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PulseError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Hackathon::from).collect())
    }
}
