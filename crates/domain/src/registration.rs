use crate::shared::entity::WebinarId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// A numeric Telegram chat id that messages can be delivered to.
/// Group chats have negative ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

impl Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidIdentityError {
    #[error("Registration has no recipient handle")]
    Missing,
    #[error("Recipient handle `{0}` is not a numeric chat id")]
    NotNumeric(String),
}

/// The recipient handle exactly as it was stored at sign-up time.
///
/// The bot stores either the numeric chat id or `@username` when the user has
/// one. Only the numeric form is addressable by the reminder sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectIdentity(String);

impl SubjectIdentity {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn chat_id(&self) -> Result<ChatId, InvalidIdentityError> {
        let handle = self.0.trim();
        if handle.is_empty() {
            return Err(InvalidIdentityError::Missing);
        }
        handle
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| InvalidIdentityError::NotNumeric(handle.to_string()))
    }
}

impl From<ChatId> for SubjectIdentity {
    fn from(chat_id: ChatId) -> Self {
        Self(chat_id.to_string())
    }
}

/// A participant's sign-up for a `Webinar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RegistrationRow")]
pub struct Registration {
    #[serde(rename = "telegram_id")]
    pub subject: SubjectIdentity,
    pub webinar_id: WebinarId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// The handle column is a string in current rows and a number in some
/// older ones
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHandle {
    Text(String),
    Number(i64),
}

impl StoredHandle {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// A registration row as stored. The handle may be missing or null, which
/// surfaces as `InvalidIdentityError::Missing` when the chat id is resolved.
#[derive(Deserialize)]
struct RegistrationRow {
    #[serde(default)]
    telegram_id: Option<StoredHandle>,
    #[serde(default)]
    telegram_username: Option<StoredHandle>,
    webinar_id: WebinarId,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        let handle = [row.telegram_id, row.telegram_username]
            .into_iter()
            .flatten()
            .map(StoredHandle::into_string)
            .find(|handle| !handle.trim().is_empty())
            .unwrap_or_default();
        Self {
            subject: SubjectIdentity::new(handle),
            webinar_id: row.webinar_id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
        }
    }
}

impl Registration {
    pub fn new(subject: SubjectIdentity, webinar_id: WebinarId) -> Self {
        Self {
            subject,
            webinar_id,
            full_name: None,
            email: None,
            phone: None,
        }
    }
}
