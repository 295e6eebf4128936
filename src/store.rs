// src/store.rs
//! Durable record of every posting seen so far.
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::error::PersistenceError;
use crate::ingest::types::Snapshot;

pub const DEFAULT_SNAPSHOT_PATH: &str = "known_jobs.json";

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// An empty snapshot when nothing was persisted yet.
    async fn load(&self) -> Result<Snapshot, PersistenceError>;
    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}

/// Snapshot kept as a JSON object `identifier -> record` in one file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn corrupt(
        &self,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> PersistenceError {
        PersistenceError::Corrupt {
            path: self.path.clone(),
            cause: cause.into(),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Snapshot, PersistenceError> {
        let data = match fs::read(&self.path).await {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no snapshot yet, starting empty");
                return Ok(Snapshot::new());
            }
            Err(cause) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    cause,
                })
            }
        };

        // A present but unreadable file must not reset history.
        let snapshot: Snapshot = serde_json::from_slice(&data).map_err(|e| self.corrupt(e))?;
        snapshot
            .check_consistency()
            .map_err(|reason| self.corrupt(reason))?;
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(PersistenceError::Encode)?;
        let write_err = |cause| PersistenceError::Write {
            path: self.path.clone(),
            cause,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await.map_err(write_err)?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, &bytes).await.map_err(write_err)?;
        fs::rename(&tmp, &self.path).await.map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), jobs = snapshot.len(), "snapshot saved");
        Ok(())
    }
}
