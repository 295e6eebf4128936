// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod differ;
pub mod error;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::config::AppConfig;
pub use crate::differ::find_new;
pub use crate::ingest::types::{JobRecord, Snapshot, Source};
pub use crate::ingest::{gather, SourceSet};
pub use crate::notify::{Deliver, DeliveryReport};
pub use crate::pipeline::{run_cycle, CycleReport};
pub use crate::store::{JsonFileStore, SnapshotStore};

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::ingest::config::{load_enabled_default, select_sites};
use crate::ingest::providers::builtin_sites;

/// Install the global tracing subscriber.
/// `RUST_LOG` overrides the default filter; `VACANCY_WATCH_LOG_JSON=1` switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vacancy_watch=info,warn"));

    let json = std::env::var("VACANCY_WATCH_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

/// Build the enabled built-in sources, sharing one HTTP client.
pub fn build_sources(cfg: &AppConfig) -> anyhow::Result<SourceSet> {
    let enabled = load_enabled_default()?;
    let sites = select_sites(builtin_sites(&cfg.dou_category), enabled.as_deref())?;

    let client = reqwest::Client::builder()
        .timeout(cfg.fetch_timeout)
        .build()
        .context("building HTTP client")?;

    let set = SourceSet::from_sites(sites, &client);
    tracing::info!(sources = ?set.names(), "sources configured");
    Ok(set)
}
