mod inmemory;
mod supabase;

use super::FetchError;
pub use inmemory::InMemoryRegistrationRepo;
pub use supabase::SupabaseRegistrationRepo;
use webinar_reminders_domain::Registration;

#[async_trait::async_trait]
pub trait IRegistrationRepo: Send + Sync {
    async fn insert(&self, registration: &Registration) -> Result<(), FetchError>;
    async fn find_all(&self) -> Result<Vec<Registration>, FetchError>;
}
