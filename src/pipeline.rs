// src/pipeline.rs
//! One scrape → diff → notify → persist cycle.
use crate::differ::find_new;
use crate::error::PipelineError;
use crate::ingest::{gather, SourceSet};
use crate::notify::{notify_new_jobs, Deliver, DeliveryReport};
use crate::store::SnapshotStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Postings currently live across all sources.
    pub gathered: usize,
    pub new_jobs: usize,
    /// Size of the persisted snapshot after the cycle.
    pub known_total: usize,
    pub delivery: DeliveryReport,
}

/// Loads the known postings, gathers the current ones, announces the new
/// ones and persists the union.
///
/// Delivery failures are logged and never stop the save. Load and save
/// failures abort the cycle.
pub async fn run_cycle(
    sources: &SourceSet,
    store: &dyn SnapshotStore,
    notifier: &dyn Deliver,
    message_limit: usize,
) -> Result<CycleReport, PipelineError> {
    let mut known = store.load().await.map_err(PipelineError::Load)?;

    let current = gather(sources).await;
    let new_jobs = find_new(&current, &known);

    let delivery = if new_jobs.is_empty() {
        tracing::info!(gathered = current.len(), "no new jobs");
        DeliveryReport::default()
    } else {
        tracing::info!(gathered = current.len(), new = new_jobs.len(), "new jobs found");
        notify_new_jobs(notifier, &new_jobs, message_limit).await
    };

    known.merge_from(&current);
    store.save(&known).await.map_err(PipelineError::Save)?;

    Ok(CycleReport {
        gathered: current.len(),
        new_jobs: new_jobs.len(),
        known_total: known.len(),
        delivery,
    })
}
