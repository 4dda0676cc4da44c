//! Pacing between successive extraction calls. The strategy sits behind a
//! trait so it can be tuned or replaced without touching pipeline logic.

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn wait(&self);
}

/// Sleep a fixed duration after every extraction call. Crude, but enough to
/// stay under the generation service's request-per-minute limits.
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn wait(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// No pacing at all. For tests and one-shot local runs.
pub struct NoDelay;

#[async_trait]
impl RateLimiter for NoDelay {
    async fn wait(&self) {}
}
