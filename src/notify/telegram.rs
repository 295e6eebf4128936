// src/notify/telegram.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Deliver;
use crate::error::DeliveryError;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Sends each chunk as one Bot API `sendMessage` call. No retries.
#[derive(Clone)]
pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    api_base: String,
    client: Client,
    timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            token,
            chat_id,
            api_base: DEFAULT_API_BASE.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Override the Bot API host (self-hosted Bot API server, tests).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.token
        )
    }
}

#[async_trait]
impl Deliver for TelegramNotifier {
    async fn deliver_chunk(&self, text: &str) -> Result<(), DeliveryError> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: true,
        };

        let rsp = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url()))?;

        let status = rsp.status();
        let reply = rsp.json::<ApiReply>().await.ok();

        if !status.is_success() {
            let description = reply
                .and_then(|r| r.description)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                description,
            });
        }
        if let Some(ApiReply {
            ok: false,
            description,
        }) = reply
        {
            return Err(DeliveryError::Rejected(
                description.unwrap_or_else(|| "ok=false".to_string()),
            ));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}
