// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod scheduler;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use reqwest::Client;

use crate::ingest::providers::{HtmlListingSource, ListingSite};
use crate::ingest::types::{JobRecord, Snapshot, Source};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "scrape_records_total",
            "Postings extracted from listing pages."
        );
        describe_counter!(
            "scrape_source_errors_total",
            "Source fetch/parse failures."
        );
        describe_histogram!("scrape_parse_ms", "Listing extraction time in milliseconds.");
        describe_gauge!(
            "scrape_last_run_ts",
            "Unix ts when sources were last gathered."
        );
    });
}

/// Collapse runs of whitespace (including NBSP and newlines) to one space and trim.
pub fn normalize_text(s: &str) -> String {
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("static regex"));
    re_ws.replace_all(s, " ").trim().to_string()
}

/// The configured sources, keyed by name. Order is the merge order.
#[derive(Clone, Default)]
pub struct SourceSet {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// One HTTP-backed source per site, sharing `client`.
    pub fn from_sites(sites: Vec<ListingSite>, client: &Client) -> Self {
        let mut set = Self::new();
        for site in sites {
            set.insert(Arc::new(HtmlListingSource::new(site, client.clone())));
        }
        set
    }

    /// Adds `source`, replacing any source registered under the same name.
    pub fn insert(&mut self, source: Arc<dyn Source>) {
        match self.sources.iter().position(|s| s.name() == source.name()) {
            Some(idx) => self.sources[idx] = source,
            None => self.sources.push(source),
        }
    }

    pub fn with(mut self, source: impl Source + 'static) -> Self {
        self.insert(Arc::new(source));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Source>> {
        self.sources.iter().find(|s| s.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.iter()
    }
}

/// Runs every source concurrently and merges what they return.
///
/// Waits for all of them. A failing (or panicking) source is logged and
/// contributes nothing; the others are unaffected. Each task hands back its
/// own records and the merge happens here after the join, in source order,
/// so later sources overwrite earlier ones on identifier collision.
pub async fn gather(sources: &SourceSet) -> Snapshot {
    ensure_metrics_described();

    let handles: Vec<_> = sources
        .iter()
        .map(|src| {
            let src = Arc::clone(src);
            let name = src.name();
            (name, tokio::spawn(async move { src.fetch_records().await }))
        })
        .collect();

    let mut snapshot = Snapshot::new();
    for (name, handle) in handles {
        let records: Vec<JobRecord> = match handle.await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::warn!(
                    source = e.source_name(),
                    error = %e,
                    fetch = e.is_fetch(),
                    "source failed"
                );
                counter!("scrape_source_errors_total").increment(1);
                continue;
            }
            Err(e) => {
                tracing::warn!(source = name, error = %e, "source task aborted");
                counter!("scrape_source_errors_total").increment(1);
                continue;
            }
        };
        tracing::info!(source = name, records = records.len(), "source scraped");
        snapshot.extend(records);
    }

    let now = chrono::Utc::now().timestamp().max(0);
    gauge!("scrape_last_run_ts").set(now as f64);

    snapshot
}
