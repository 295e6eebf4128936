//! Scrape every enabled source once and print what it yields.
//! Never reads or writes the snapshot and never sends notifications.

use std::time::Duration;

use vacancy_watch::ingest::config::{load_enabled_default, select_sites};
use vacancy_watch::ingest::providers::{builtin_sites, dou, HtmlListingSource};
use vacancy_watch::{init_tracing, Source};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let category =
        std::env::var("DOU_CATEGORY").unwrap_or_else(|_| dou::DEFAULT_CATEGORY.to_string());
    let enabled = load_enabled_default()?;
    let sites = select_sites(builtin_sites(&category), enabled.as_deref())?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    for site in sites {
        let source = HtmlListingSource::new(site, client.clone());
        match source.fetch_records().await {
            Ok(jobs) => {
                println!("== {} ({} jobs)", source.name(), jobs.len());
                for j in jobs {
                    println!("  {} | {} | {}", j.title, j.organization, j.identifier);
                }
            }
            Err(e) => println!("== {} failed: {e}", source.name()),
        }
    }
    Ok(())
}
