// src/ingest/config.rs
//! Which job boards to scrape.
//!
//! A selection file is optional. `*.json` files hold either a bare list
//! (`["dou"]`) or an object (`{"sources": ["dou"]}`); anything else is read as
//! TOML (`sources = ["dou"]`). Without a file every built-in board is scraped.
use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::providers::ListingSite;

pub const ENV_PATH: &str = "VACANCY_WATCH_SOURCES_PATH";

const FALLBACK_PATHS: [&str; 2] = ["config/sources.toml", "config/sources.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Toml,
        }
    }

    fn expected_shape(self) -> &'static str {
        match self {
            Format::Toml => r#"expected `sources = ["dou", "djinni"]`"#,
            Format::Json => r#"expected `["dou", "djinni"]` or `{"sources": [...]}`"#,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Toml => "TOML",
            Format::Json => "JSON",
        })
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SourcesTable {
    sources: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSelection {
    List(Vec<String>),
    Table(SourcesTable),
}

/// Board names selected by the file at `path`, lowercased and deduplicated.
pub fn load_enabled_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading source selection {}", path.display()))?;
    let format = Format::of(path);
    parse_selection(&content, format)
        .with_context(|| format!("{format} source selection {}", path.display()))
}

/// Source selection from `$VACANCY_WATCH_SOURCES_PATH`, then
/// `config/sources.toml`, then `config/sources.json`.
///
/// `None` means no selection file exists and every source is enabled.
pub fn load_enabled_default() -> Result<Option<Vec<String>>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let path = PathBuf::from(p);
        if !path.exists() {
            bail!("{ENV_PATH}={} does not exist", path.display());
        }
        return load_enabled_from(&path).map(Some);
    }
    FALLBACK_PATHS
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(load_enabled_from)
        .transpose()
}

/// Keep only the sites named in `enabled` (all of them for `None`).
/// Unknown names are an error so typos don't silently disable scraping.
pub fn select_sites(sites: Vec<ListingSite>, enabled: Option<&[String]>) -> Result<Vec<ListingSite>> {
    let Some(enabled) = enabled else {
        return Ok(sites);
    };
    if let Some(unknown) = enabled
        .iter()
        .find(|name| !sites.iter().any(|s| s.name.eq_ignore_ascii_case(name)))
    {
        let known: Vec<_> = sites.iter().map(|s| s.name).collect();
        return Err(anyhow!(
            "unknown source {unknown:?} (known: {})",
            known.join(", ")
        ));
    }
    Ok(sites
        .into_iter()
        .filter(|s| enabled.iter().any(|n| n.eq_ignore_ascii_case(s.name)))
        .collect())
}

fn parse_selection(content: &str, format: Format) -> Result<Vec<String>> {
    let raw = match format {
        Format::Toml => toml::from_str::<SourcesTable>(content)
            .map(|t| t.sources)
            .map_err(|e| anyhow!("{}: {}", format.expected_shape(), e.message())),
        Format::Json => serde_json::from_str::<JsonSelection>(content)
            .map(|sel| match sel {
                JsonSelection::List(names) => names,
                JsonSelection::Table(t) => t.sources,
            })
            .map_err(|_| anyhow!("{}", format.expected_shape())),
    }?;
    board_names(raw)
}

/// An empty selection would turn the watcher into a no-op, so it is rejected;
/// deleting the file is how every board gets enabled.
fn board_names(raw: Vec<String>) -> Result<Vec<String>> {
    let names: BTreeSet<String> = raw
        .iter()
        .map(|n| n.trim().to_ascii_lowercase())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        bail!("selection names no sources");
    }
    Ok(names.into_iter().collect())
}
