use crate::shared::entity::{Entity, WebinarId};
use serde::{Deserialize, Serialize};

/// A scheduled live event participants can register for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WebinarRow")]
pub struct Webinar {
    pub id: WebinarId,
    /// Start date as stored, ISO-8601 with or without a UTC offset.
    /// Use `TimeNormalizer` to resolve it to an instant. Empty when the row
    /// has no date, which fails normalization.
    pub date: String,
    pub link: Option<String>,
}

#[derive(Deserialize)]
struct WebinarRow {
    id: WebinarId,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl From<WebinarRow> for Webinar {
    fn from(row: WebinarRow) -> Self {
        Self {
            id: row.id,
            date: row.date.or(row.start_date).unwrap_or_default(),
            link: row.link,
        }
    }
}

impl Webinar {
    pub fn new(id: WebinarId, date: impl Into<String>) -> Self {
        Self {
            id,
            date: date.into(),
            link: None,
        }
    }

    /// The join link, ignoring blank values the admins sometimes leave behind
    pub fn join_link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

impl Entity<WebinarId> for Webinar {
    fn id(&self) -> WebinarId {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_deserializes_store_rows() {
        let row =
            r#"{ "id": 1, "date": "2025-07-26T10:00:00", "link": "https://meet.example/abc" }"#;
        let webinar: Webinar = serde_json::from_str(row).unwrap();
        assert_eq!(webinar.id, WebinarId::from(1));
        assert_eq!(webinar.join_link(), Some("https://meet.example/abc"));

        let row = r#"{ "id": 2, "start_date": "2025-07-27T10:00:00+06:00" }"#;
        let webinar: Webinar = serde_json::from_str(row).unwrap();
        assert_eq!(webinar.date, "2025-07-27T10:00:00+06:00");
        assert!(webinar.link.is_none());
    }

    #[test]
    fn rows_without_a_date_still_decode() {
        let row = r#"{ "id": 3, "date": null, "link": "https://meet.example/c" }"#;
        let webinar: Webinar = serde_json::from_str(row).unwrap();
        assert_eq!(webinar.id, WebinarId::from(3));
        assert!(webinar.date.is_empty());
    }

    #[test]
    fn blank_links_are_treated_as_missing() {
        let mut webinar = Webinar::new(WebinarId::from(1), "2025-07-26T10:00:00");
        webinar.link = Some("   ".into());
        assert_eq!(webinar.join_link(), None);
    }
}
