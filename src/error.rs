// src/error.rs
//! Error taxonomy for the scrape–diff–notify cycle.
//!
//! Source and delivery errors are recovered locally (logged, cycle continues).
//! Persistence errors are fatal to the cycle.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single listing source. Never fatal: the orchestrator logs it
/// and the source contributes zero records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{name}: request failed: {cause}")]
    Fetch { name: &'static str, cause: String },

    #[error("{name}: returned HTTP {status}")]
    Status { name: &'static str, status: u16 },

    #[error("{name}: could not read listing: {cause}")]
    Parse { name: &'static str, cause: String },
}

impl SourceError {
    pub fn source_name(&self) -> &'static str {
        match self {
            SourceError::Fetch { name, .. }
            | SourceError::Status { name, .. }
            | SourceError::Parse { name, .. } => name,
        }
    }

    /// True for transport and HTTP status failures, false for parse failures.
    pub fn is_fetch(&self) -> bool {
        !matches!(self, SourceError::Parse { .. })
    }
}

/// Failure to deliver one notification chunk.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("delivery rejected with HTTP {status}: {description}")]
    Status { status: u16, description: String },

    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// Failure to load or save the snapshot of known postings.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("reading snapshot {path}: {cause}")]
    Read {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    /// Unparseable JSON, or well-formed data that breaks the snapshot invariants.
    #[error("snapshot {path} is not valid: {cause}")]
    Corrupt {
        path: PathBuf,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("encoding snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("writing snapshot {path}: {cause}")]
    Write {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },
}

/// Fatal cycle failure.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("loading known jobs: {0}")]
    Load(#[source] PersistenceError),

    #[error("saving known jobs: {0}")]
    Save(#[source] PersistenceError),
}
