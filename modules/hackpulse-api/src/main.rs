use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hackpulse_common::Config;
use hackpulse_scout::{
    extractor::GeminiExtractor,
    search::{AdHocSearch, TavilySearcher},
};
use hackpulse_store::PgStore;

mod handlers;

pub struct AppState {
    pub store: PgStore,
    /// None when the search/generation keys are not configured; the AI
    /// search endpoint then reports a misconfiguration instead of the whole
    /// server refusing to start.
    pub adhoc: Option<AdHocSearch>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("hackpulse_api=info".parse()?),
        )
        .init();

    info!("HackPulse API starting...");

    let config = Config::api_from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = PgStore::new(pool);
    store.migrate().await?;

    let adhoc = if config.tavily_api_key.is_empty() || config.gemini_api_key.is_empty() {
        warn!("TAVILY_API_KEY or GEMINI_API_KEY not set, AI search disabled");
        None
    } else {
        Some(AdHocSearch::new(
            Box::new(TavilySearcher::new(&config.tavily_api_key)),
            Box::new(GeminiExtractor::new(&config.gemini_api_key)),
        ))
    };

    let state = Arc::new(AppState { store, adhoc });

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/api/hackathons", get(handlers::list_hackathons))
        .route("/api/search/ai", get(handlers::search_ai))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );

    let addr = format!("{}:{}", config.api_host, config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
