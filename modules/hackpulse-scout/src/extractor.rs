use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use gemini_client::{util, Gemini};
use hackpulse_common::{CandidatePost, Hackathon, PulseError, Status};

/// Model for the per-post ingestion path. Cheap; it runs on every candidate.
pub const INGEST_MODEL: &str = "gemini-2.5-flash-lite";
/// Model for the ad-hoc search path: one batched call per user query.
pub const SEARCH_MODEL: &str = "gemini-2.5-flash";

/// Cap on announcement/snippet context sent per call.
const MAX_CONTEXT_BYTES: usize = 30_000;

/// Turns unstructured announcement text into structured records.
#[async_trait]
pub trait RecordExtractor: Send + Sync {
    /// Extract zero or one record from a single announcement. A malformed
    /// model response is logged and yields `None`; only transport failures
    /// surface as errors. Either way the caller moves on to the next post.
    async fn extract_post(
        &self,
        post: &CandidatePost,
        today: NaiveDate,
    ) -> Result<Option<Hackathon>>;

    /// Batch extraction over aggregated web-search snippets.
    async fn extract_snippets(
        &self,
        query: &str,
        context: &str,
        today: NaiveDate,
    ) -> Result<Vec<Hackathon>>;
}

/// What the model returns for one record. Every field is optional so a
/// partial response, or an explicit `null` where a string was asked for,
/// still deserializes; validation happens in `into_record`.
#[derive(Debug, Deserialize)]
struct ExtractedFields {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date_str: Option<String>,
    #[serde(default)]
    deadline: Option<String>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    age_limit: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// The model sometimes emits the string token "null" instead of a real null.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty() && s != "null")
}

impl ExtractedFields {
    /// Validate and convert into a record. An empty or literal-"null" title
    /// discards the record: an untitled record cannot be deduplicated or
    /// displayed. An unparseable deadline keeps the record without one.
    fn into_record(self, today: NaiveDate) -> Option<Hackathon> {
        let title = match normalize_optional(self.title) {
            Some(t) => t,
            None => {
                warn!("Extraction returned an empty title, dropping record");
                return None;
            }
        };

        let deadline = match normalize_optional(self.deadline) {
            Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(e) => {
                    warn!(
                        title = %title,
                        deadline = %raw,
                        error = %e,
                        "Unparseable deadline, keeping record without one"
                    );
                    None
                }
            },
            None => None,
        };

        let mut record = Hackathon {
            id: None,
            title,
            date: self.date_str.unwrap_or_default(),
            deadline,
            format: self.format.unwrap_or_default(),
            city: normalize_optional(self.city),
            age_limit: self.age_limit.unwrap_or_default(),
            link: normalize_optional(self.link),
            status: Status::parse(self.status.as_deref().unwrap_or_default()),
            created_at: None,
        };
        record.refresh_status(today);
        Some(record)
    }
}

fn parse_object_response(raw: &str) -> Result<ExtractedFields, serde_json::Error> {
    serde_json::from_str(util::strip_code_fences(raw))
}

fn parse_array_response(raw: &str) -> Result<Vec<ExtractedFields>, serde_json::Error> {
    serde_json::from_str(util::extract_array_span(util::strip_code_fences(raw)))
}

/// Anchors the model to today's date and the publish date so relative date
/// language ("next week", "deadline on Friday") resolves to the right year.
fn ingest_prompt(today: NaiveDate, published: NaiveDate, text: &str) -> String {
    format!(
        "Сегодняшняя дата: {today}. Пост был опубликован: {published}.\n\
         Проанализируй текст анонса. Вычисли точный год, опираясь на дату публикации. \
         Если дедлайн регистрации или само событие уже прошли относительно сегодняшней \
         даты, верни статус 'DEAD'. Если оно еще предстоит, верни 'LIVE'.\n\
         Верни СТРОГО JSON с полями:\n\
         - title (строка)\n\
         - date_str (строка, например '21-22 февраля 2025')\n\
         - deadline (строка 'YYYY-MM-DD', или null если не указан)\n\
         - format (строка: строго ОФЛАЙН, ОНЛАЙН или ОФЛАЙН+ОНЛАЙН)\n\
         - city (строка или null)\n\
         - age_limit (строка, например 'Нет ограничений')\n\
         - link (строка URL или null)\n\
         - status ('LIVE' или 'DEAD')\n\n\
         Текст анонса:\n---\n{text}\n---\n\
         Только чистый JSON."
    )
}

fn search_prompt(today: NaiveDate, query: &str, context: &str) -> String {
    format!(
        "Сегодняшняя дата: {today}.\n\
         Пользователь ищет: '{query}'.\n\
         Вот сырые тексты из интернета (они могут быть на английском или русском):\n\
         {context}\n\n\
         Извлеки IT-мероприятия, которые они описывают. Если ивент национальный или \
         проходит сразу во многих городах, включи его с city равным null. Переводи \
         названия городов на русский. Если точных дат нет, пиши 'Даты уточняются' в \
         date_str. Если ничего не найдено, верни пустой массив [].\n\
         Верни массив JSON. Поля одного объекта:\n\
         - title (строка, на русском)\n\
         - date_str (строка, на русском)\n\
         - deadline (строка 'YYYY-MM-DD' или null)\n\
         - format (строка: строго ОФЛАЙН, ОНЛАЙН или ОФЛАЙН+ОНЛАЙН)\n\
         - city (строка на русском или null)\n\
         - age_limit (строка, например 'Нет ограничений')\n\
         - link (строка URL или null)\n\
         - status (строка: LIVE если дедлайн не прошел относительно сегодняшней даты, иначе DEAD)\n\n\
         Только чистый JSON массив."
    )
}

/// Extractor backed by Gemini. No retries: a failed call is a failed
/// extraction, and the cycle moves on.
pub struct GeminiExtractor {
    ingest: Gemini,
    search: Gemini,
}

impl GeminiExtractor {
    pub fn new(api_key: &str) -> Self {
        Self {
            ingest: Gemini::new(api_key, INGEST_MODEL),
            search: Gemini::new(api_key, SEARCH_MODEL),
        }
    }
}

#[async_trait]
impl RecordExtractor for GeminiExtractor {
    async fn extract_post(
        &self,
        post: &CandidatePost,
        today: NaiveDate,
    ) -> Result<Option<Hackathon>> {
        let text = util::truncate_to_char_boundary(&post.text, MAX_CONTEXT_BYTES);
        let prompt = ingest_prompt(today, post.published_at.date_naive(), text);

        let raw = self.ingest.generate(&prompt, 0.1).await?;

        match parse_object_response(&raw) {
            Ok(fields) => Ok(fields.into_record(today)),
            Err(e) => {
                warn!(error = %e, raw = %raw, "Extraction response is not valid JSON, skipping post");
                Ok(None)
            }
        }
    }

    async fn extract_snippets(
        &self,
        query: &str,
        context: &str,
        today: NaiveDate,
    ) -> Result<Vec<Hackathon>> {
        let context = util::truncate_to_char_boundary(context, MAX_CONTEXT_BYTES);
        let prompt = search_prompt(today, query, context);

        let raw = self.search.generate(&prompt, 0.2).await?;

        match parse_array_response(&raw) {
            Ok(items) => Ok(items
                .into_iter()
                .filter_map(|f| f.into_record(today))
                .collect()),
            Err(e) => {
                warn!(query, error = %e, raw = %raw, "Batch extraction response is not valid JSON");
                Err(PulseError::Parse(format!("batch extraction for '{query}': {e}")).into())
            }
        }
    }
}
