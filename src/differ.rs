// src/differ.rs
use crate::ingest::types::{JobRecord, Snapshot};

/// Records of `current` whose identifier is absent from `previous`,
/// sorted by identifier ascending. Neither input is modified.
pub fn find_new(current: &Snapshot, previous: &Snapshot) -> Vec<JobRecord> {
    current
        .records()
        .filter(|job| !previous.contains(&job.identifier))
        .cloned()
        .collect()
}
