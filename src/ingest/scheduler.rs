// src/ingest/scheduler.rs
use metrics::counter;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Runs `tick` immediately and then once per `period` until it fails.
/// A slow cycle delays the next one instead of triggering a burst.
pub async fn run_periodically<F, Fut>(period: Duration, mut tick: F) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        tick().await?;
        counter!("watch_cycles_total").increment(1);
        tracing::debug!(target: "scheduler", next_in_secs = period.as_secs(), "cycle done");
    }
}
