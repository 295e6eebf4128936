//! vacancy-watch — one scrape → diff → notify → persist cycle, or a loop of
//! them when `WATCH_INTERVAL_SECS` is set.

use anyhow::Context;
use vacancy_watch::ingest::scheduler::run_periodically;
use vacancy_watch::notify::telegram::TelegramNotifier;
use vacancy_watch::{build_sources, init_tracing, run_cycle, AppConfig, JsonFileStore};

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    let sources = build_sources(&cfg)?;
    let store = JsonFileStore::new(&cfg.snapshot_path);
    let notifier = TelegramNotifier::new(cfg.telegram_token.clone(), cfg.chat_id.clone());

    let (sources, store, notifier, limit) = (&sources, &store, &notifier, cfg.message_limit);
    let cycle = move || async move {
        let report = run_cycle(sources, store, notifier, limit)
            .await
            .context("cycle aborted")?;
        tracing::info!(
            gathered = report.gathered,
            new = report.new_jobs,
            known = report.known_total,
            chunks = report.delivery.chunks,
            failed_chunks = report.delivery.failed,
            "cycle finished"
        );
        Ok::<_, anyhow::Error>(())
    };

    match cfg.watch_interval {
        Some(period) => run_periodically(period, cycle).await,
        None => cycle().await,
    }
}

#[tokio::main]
async fn main() {
    // Load .env in local/dev; no-op when the file is absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = ?e, "fatal");
        std::process::exit(1);
    }
}
