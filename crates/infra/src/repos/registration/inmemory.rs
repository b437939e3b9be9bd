use super::IRegistrationRepo;
use crate::repos::{shared::inmemory_repo::*, FetchError};
use webinar_reminders_domain::Registration;

pub struct InMemoryRegistrationRepo {
    registrations: std::sync::Mutex<Vec<Registration>>,
}

impl InMemoryRegistrationRepo {
    pub fn new() -> Self {
        Self::from(Vec::new())
    }
}

impl Default for InMemoryRegistrationRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Registration>> for InMemoryRegistrationRepo {
    fn from(registrations: Vec<Registration>) -> Self {
        Self {
            registrations: std::sync::Mutex::new(registrations),
        }
    }
}

#[async_trait::async_trait]
impl IRegistrationRepo for InMemoryRegistrationRepo {
    async fn insert(&self, registration: &Registration) -> Result<(), FetchError> {
        insert(registration, &self.registrations);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Registration>, FetchError> {
        Ok(find_all(&self.registrations))
    }
}
