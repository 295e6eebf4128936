// src/config/mod.rs
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::ingest::providers::dou;
use crate::notify::DEFAULT_MESSAGE_LIMIT;
use crate::store::DEFAULT_SNAPSHOT_PATH;

pub const ENV_TOKEN: &str = "TELEGRAM_TOKEN";
pub const ENV_CHAT_ID: &str = "CHAT_ID";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Clone)]
pub struct AppConfig {
    pub telegram_token: String,
    pub chat_id: String,
    pub snapshot_path: PathBuf,
    pub message_limit: usize,
    pub fetch_timeout: Duration,
    /// Repeat the cycle on this period instead of running once.
    pub watch_interval: Option<Duration>,
    pub dou_category: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary key lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |k: &str| {
            get(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("missing required env var {k}"))
        };
        let optional = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |k: &str| -> Result<Option<u64>> {
            optional(k)
                .map(|v| v.parse::<u64>().with_context(|| format!("{k}={v:?} is not a number")))
                .transpose()
        };

        let telegram_token = required(ENV_TOKEN)?;
        let chat_id = required(ENV_CHAT_ID)?;

        let message_limit = match number("MESSAGE_LIMIT")? {
            Some(0) => return Err(anyhow!("MESSAGE_LIMIT must be positive")),
            Some(n) => usize::try_from(n).context("MESSAGE_LIMIT out of range")?,
            None => DEFAULT_MESSAGE_LIMIT,
        };
        // a zero reqwest timeout fails every request at once
        let fetch_timeout = match number("FETCH_TIMEOUT_SECS")? {
            Some(0) => return Err(anyhow!("FETCH_TIMEOUT_SECS must be positive")),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_FETCH_TIMEOUT,
        };

        Ok(Self {
            telegram_token,
            chat_id,
            snapshot_path: optional("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            message_limit,
            fetch_timeout,
            watch_interval: number("WATCH_INTERVAL_SECS")?
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
            dou_category: optional("DOU_CATEGORY")
                .unwrap_or_else(|| dou::DEFAULT_CATEGORY.to_string()),
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("snapshot_path", &self.snapshot_path)
            .field("message_limit", &self.message_limit)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("watch_interval", &self.watch_interval)
            .field("dou_category", &self.dou_category)
            .finish()
    }
}
