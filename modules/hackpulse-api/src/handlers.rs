use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, warn};

use hackpulse_store::RecordStore;

use crate::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

fn trimmed(q: &Option<String>) -> Option<&str> {
    q.as_deref().map(str::trim).filter(|q| !q.is_empty())
}

/// GET /api/hackathons: all records, or title/city substring search.
/// Statuses are recomputed against today's date before serving, so records
/// written long ago go DEAD on time without any background job.
pub async fn list_hackathons(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    let result = match trimmed(&params.q) {
        Some(q) => state.store.search(q).await,
        None => state.store.list().await,
    };

    match result {
        Ok(mut records) => {
            let today = Utc::now().date_naive();
            for record in &mut records {
                record.refresh_status(today);
            }
            Json(records).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch hackathons");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to fetch data"})),
            )
                .into_response()
        }
    }
}

/// GET /api/search/ai: live web-search extraction for a user query.
/// Nothing is persisted.
pub async fn search_ai(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    let Some(query) = trimmed(&params.q) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Query parameter 'q' is required"})),
        )
            .into_response();
    };

    let Some(adhoc) = &state.adhoc else {
        error!("AI search requested but API keys are not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": "Server misconfigured: missing API keys"})),
        )
            .into_response();
    };

    match adhoc.run(query, Utc::now().date_naive()).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!(query, error = %e, "AI search failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({"error": "AI search failed"})),
            )
                .into_response()
        }
    }
}
