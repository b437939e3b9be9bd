use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub trait Entity<T: PartialEq> {
    fn id(&self) -> T;
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// Identifier of a `Webinar` row in the registration store.
///
/// The store hands out integer primary keys, but registrations written by
/// older bot versions reference them as strings, so both representations are
/// accepted and compared by their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WebinarId(String);

impl WebinarId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WebinarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidIDError {
    #[error("ID: {0} is malformed")]
    Malformed(String),
}

impl FromStr for WebinarId {
    type Err = InvalidIDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidIDError::Malformed(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<i64> for WebinarId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for WebinarId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Numeric ids go back to the store as numbers
        match self.0.parse::<i64>() {
            Ok(id) => serializer.serialize_i64(id),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for WebinarId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct WebinarIdVisitor;

        impl<'de> Visitor<'de> for WebinarIdVisitor {
            type Value = WebinarId;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A webinar id as an integer or a non-empty string")
            }

            fn visit_i64<E>(self, value: i64) -> Result<WebinarId, E>
            where
                E: serde::de::Error,
            {
                Ok(WebinarId::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<WebinarId, E>
            where
                E: serde::de::Error,
            {
                Ok(WebinarId(value.to_string()))
            }

            fn visit_str<E>(self, value: &str) -> Result<WebinarId, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<WebinarId>()
                    .map_err(|_| E::custom(format!("Malformed webinar id: {:?}", value)))
            }
        }

        deserializer.deserialize_any(WebinarIdVisitor)
    }
}
