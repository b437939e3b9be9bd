mod inmemory;
mod telegram;

pub use inmemory::InMemoryNotifier;
pub use telegram::TelegramNotifier;
use thiserror::Error;
use webinar_reminders_domain::ChatId;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Unable to reach the messaging api: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Message to chat {target} was rejected: {reason}")]
    Rejected { target: ChatId, reason: String },
}

/// The channel reminders are delivered through
#[async_trait::async_trait]
pub trait INotificationSink: Send + Sync {
    async fn deliver(&self, target: ChatId, text: &str) -> Result<(), DeliveryError>;
}
