use super::IWebinarRepo;
use crate::repos::{FetchError, SupabaseClient};
use webinar_reminders_domain::{Webinar, WebinarId};

const TABLE: &str = "webinars";

pub struct SupabaseWebinarRepo {
    client: SupabaseClient,
}

impl SupabaseWebinarRepo {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IWebinarRepo for SupabaseWebinarRepo {
    async fn find(&self, webinar_id: &WebinarId) -> Result<Option<Webinar>, FetchError> {
        let filter = [("id", format!("eq.{}", webinar_id))];
        let webinars: Vec<Webinar> = self.client.select(TABLE, &filter).await?;
        Ok(webinars.into_iter().next())
    }

    async fn find_all(&self) -> Result<Vec<Webinar>, FetchError> {
        self.client.select(TABLE, &[]).await
    }
}
