use std::env;

use crate::PulseError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // External services
    pub gemini_api_key: String,
    pub tavily_api_key: String,

    // API server
    pub api_host: String,
    pub api_port: u16,

    // Ingestion cadence
    pub scrape_interval_hours: u64,
    pub extract_delay_secs: u64,
}

impl Config {
    /// Load configuration for the ingestion worker.
    pub fn scout_from_env() -> Result<Self, PulseError> {
        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            gemini_api_key: required_env("GEMINI_API_KEY")?,
            tavily_api_key: env::var("TAVILY_API_KEY").unwrap_or_default(),
            api_host: String::new(),
            api_port: 0,
            scrape_interval_hours: env_u64("SCRAPE_INTERVAL_HOURS", 6)?,
            extract_delay_secs: env_u64("EXTRACT_DELAY_SECS", 3)?,
        })
    }

    /// Load configuration for the read-path API server. The AI search keys
    /// are optional here: without them the search endpoint reports a
    /// misconfiguration instead of the process refusing to start.
    pub fn api_from_env() -> Result<Self, PulseError> {
        Ok(Self {
            database_url: required_env("DATABASE_URL")?,
            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            tavily_api_key: env::var("TAVILY_API_KEY").unwrap_or_default(),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| PulseError::Config("API_PORT must be a number".to_string()))?,
            scrape_interval_hours: 0,
            extract_delay_secs: 0,
        })
    }
}

fn required_env(key: &str) -> Result<String, PulseError> {
    env::var(key)
        .map_err(|_| PulseError::Config(format!("{key} environment variable is required")))
}

fn env_u64(key: &str, default: u64) -> Result<u64, PulseError> {
    match env::var(key) {
        Ok(v) => v
            .parse()
            .map_err(|_| PulseError::Config(format!("{key} must be a number"))),
        Err(_) => Ok(default),
    }
}
