use thiserror::Error;

/// Error taxonomy for the ingestion pipeline. None of these are fatal to the
/// process: a fetch failure skips the channel, a parse or validation failure
/// skips the single post, a database failure skips the single record.
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
