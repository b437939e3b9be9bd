use super::IWebinarRepo;
use crate::repos::{shared::inmemory_repo::*, FetchError};
use webinar_reminders_domain::{Webinar, WebinarId};

pub struct InMemoryWebinarRepo {
    webinars: std::sync::Mutex<Vec<Webinar>>,
}

impl InMemoryWebinarRepo {
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// Stands in for an organizer adding a webinar to the store
    pub fn insert(&self, webinar: &Webinar) {
        insert(webinar, &self.webinars);
    }
}

impl Default for InMemoryWebinarRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Webinar>> for InMemoryWebinarRepo {
    fn from(webinars: Vec<Webinar>) -> Self {
        Self {
            webinars: std::sync::Mutex::new(webinars),
        }
    }
}

#[async_trait::async_trait]
impl IWebinarRepo for InMemoryWebinarRepo {
    async fn find(&self, webinar_id: &WebinarId) -> Result<Option<Webinar>, FetchError> {
        Ok(find(webinar_id, &self.webinars))
    }

    async fn find_all(&self) -> Result<Vec<Webinar>, FetchError> {
        Ok(find_all(&self.webinars))
    }
}
