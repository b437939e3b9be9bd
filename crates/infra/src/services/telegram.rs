use super::{DeliveryError, INotificationSink};
use crate::config::TelegramConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use webinar_reminders_domain::ChatId;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through the Telegram Bot API
pub struct TelegramNotifier {
    client: Client,
    send_message_url: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            send_message_url: format!(
                "{}/bot{}/sendMessage",
                config.api_url.trim_end_matches('/'),
                config.bot_token
            ),
        })
    }
}

#[async_trait::async_trait]
impl INotificationSink for TelegramNotifier {
    async fn deliver(&self, target: ChatId, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.send_message_url)
            .json(&SendMessageRequest {
                chat_id: target.0,
                text,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        // The Bot API answers errors with a json body as well
        match serde_json::from_slice::<BotApiResponse>(&body) {
            Ok(res) if res.ok && status.is_success() => Ok(()),
            Ok(res) => Err(DeliveryError::Rejected {
                target,
                reason: res
                    .description
                    .unwrap_or_else(|| format!("status {}", status.as_u16())),
            }),
            Err(_) => Err(DeliveryError::Rejected {
                target,
                reason: format!("status {} with unexpected body", status.as_u16()),
            }),
        }
    }
}
