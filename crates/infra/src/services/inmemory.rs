use super::{DeliveryError, INotificationSink};
use std::{collections::HashSet, sync::Mutex};
use webinar_reminders_domain::ChatId;

/// Records every delivery instead of sending it. Chats marked with
/// `fail_for` reject their messages.
#[derive(Default)]
pub struct InMemoryNotifier {
    delivered: Mutex<Vec<(ChatId, String)>>,
    failing: Mutex<HashSet<ChatId>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn fail_for(&self, target: ChatId) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(target);
    }

    pub fn delivered(&self) -> Vec<(ChatId, String)> {
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl INotificationSink for InMemoryNotifier {
    async fn deliver(&self, target: ChatId, text: &str) -> Result<(), DeliveryError> {
        if self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&target)
        {
            return Err(DeliveryError::Rejected {
                target,
                reason: "chat is marked as failing".into(),
            });
        }
        self.delivered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((target, text.to_string()));
        Ok(())
    }
}
