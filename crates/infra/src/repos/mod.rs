mod registration;
mod shared;
mod webinar;

use crate::config::SupabaseConfig;
pub use registration::{IRegistrationRepo, InMemoryRegistrationRepo, SupabaseRegistrationRepo};
pub use shared::supabase::SupabaseClient;
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tracing::info;
pub use webinar::{IWebinarRepo, InMemoryWebinarRepo, SupabaseWebinarRepo};

/// The registration store could not be read or written
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request against `{table}` failed: {source}")]
    Transport {
        table: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("`{table}` responded with status {status}: {body}")]
    Status {
        table: String,
        status: u16,
        body: String,
    },
    #[error("Unable to decode rows of `{table}`: {source}")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone)]
pub struct Repos {
    pub registrations: Arc<dyn IRegistrationRepo>,
    pub webinars: Arc<dyn IWebinarRepo>,
}

impl Repos {
    pub fn create_supabase(config: &SupabaseConfig, timeout: Duration) -> reqwest::Result<Self> {
        info!("Using the Supabase registration store at {}", config.url);
        let client = SupabaseClient::new(config, timeout)?;
        Ok(Self {
            registrations: Arc::new(SupabaseRegistrationRepo::new(client.clone())),
            webinars: Arc::new(SupabaseWebinarRepo::new(client)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            registrations: Arc::new(InMemoryRegistrationRepo::new()),
            webinars: Arc::new(InMemoryWebinarRepo::new()),
        }
    }
}
