mod inmemory;
mod supabase;

use super::FetchError;
pub use inmemory::InMemoryWebinarRepo;
pub use supabase::SupabaseWebinarRepo;
use webinar_reminders_domain::{Webinar, WebinarId};

/// Webinars are managed by the organizers directly in the store,
/// so this side only ever reads them.
#[async_trait::async_trait]
pub trait IWebinarRepo: Send + Sync {
    async fn find(&self, webinar_id: &WebinarId) -> Result<Option<Webinar>, FetchError>;
    async fn find_all(&self) -> Result<Vec<Webinar>, FetchError>;
}
