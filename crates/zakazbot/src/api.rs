//! Outbound Bot API client.

use serde_json::json;
use zakazcore::config;

/// Handle for outbound `sendMessage` calls.
///
/// Fire-and-forget by contract: the Bot API response status is not
/// inspected, so a rejected send looks the same as a delivered one.
/// Only transport-level failures surface, and the command layer logs
/// and swallows those.
#[derive(Debug, Clone)]
pub struct TelegramApi {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl TelegramApi {
    /// Client against an explicit API base URL (tests point this at a
    /// mock server) and bot token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config::network::timeout())
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http,
        }
    }

    /// Client from BOT_API_URL / TELEGRAM_BOT_TOKEN.
    pub fn from_env() -> Self {
        Self::new(config::BOT_API_URL.as_str(), config::TELEGRAM_BOT_TOKEN.as_str())
    }

    /// `POST {base}/bot{token}/sendMessage` with `{chat_id, text}`.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), reqwest::Error> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        self.http
            .post(&url)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;
        Ok(())
    }
}
