use crate::config::TelegramConfig;
use crate::error::{Result, WatchError};
use crate::notify::{Delivery, Notifier, render_message};
use crate::schedule::ProcessedSchedule;
use serde_json::{Value, json};
use std::time::Duration;

const API_BASE: &str = "https://api.telegram.org";

/// Sends the rendered schedule to a chat through the Bot API `sendMessage` method.
///
/// Uses a blocking client, so it must be called off the async runtime.
pub struct TelegramNotifier {
    config: TelegramConfig,
    timeout: Duration,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig, timeout: Duration) -> Self {
        Self { config, timeout, api_base: API_BASE.to_string() }
    }

    /// Point at a different Bot API server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.config.bot_token)
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        })
    }

    fn send(&self, text: &str) -> Result<()> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.failure(e.to_string()))?;

        let response = client
            .post(self.endpoint())
            .json(&self.request_body(text))
            .send()
            .map_err(|e| self.failure(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Bot API errors carry a human readable description
        let description = response
            .json::<Value>()
            .ok()
            .and_then(|body| body.get("description").and_then(Value::as_str).map(String::from))
            .unwrap_or_default();

        Err(self.failure(format!("{} {}", status, description).trim_end().to_string()))
    }

    fn failure(&self, reason: String) -> WatchError {
        WatchError::NotificationFailed { channel: self.name().to_string(), reason }
    }
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    fn deliver(&self, schedule: &ProcessedSchedule) -> Delivery {
        match self.send(&render_message(schedule)) {
            Ok(()) => {
                log::info!("Sent schedule to Telegram chat {}", self.config.chat_id);
                Delivery::delivered()
            }
            Err(e) => {
                log::error!("{}", e);
                Delivery::failed(e.to_string())
            }
        }
    }
}
