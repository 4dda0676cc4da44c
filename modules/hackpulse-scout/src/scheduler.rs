use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::ingest::Ingestor;

/// Drives one full ingestion pass on a fixed period, forever. The first
/// cycle runs immediately on startup. The loop awaits each cycle before
/// awaiting the next tick, so cycles never overlap.
pub struct Scheduler {
    ingestor: Ingestor,
    period: Duration,
}

impl Scheduler {
    pub fn new(ingestor: Ingestor, period: Duration) -> Self {
        Self { ingestor, period }
    }

    pub async fn run(&self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            info!("Starting ingestion cycle");
            let stats = self.ingestor.run_cycle().await;
            info!("{stats}");
            info!(
                period_secs = self.period.as_secs(),
                "Cycle complete, idle until next tick"
            );
        }
    }
}
