use crate::{config::SupabaseConfig, repos::FetchError};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::warn;

/// Thin client for the PostgREST interface of a Supabase project
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn transport_error(table: &str) -> impl FnOnce(reqwest::Error) -> FetchError + '_ {
        move |source| FetchError::Transport {
            table: table.to_string(),
            source,
        }
    }

    async fn check_status(
        table: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(FetchError::Status {
            table: table.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    /// `filters` are PostgREST query parameters, e.g. `("id", "eq.3")`
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, FetchError> {
        let response = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("select", "*")])
            .query(filters)
            .send()
            .await
            .map_err(Self::transport_error(table))?;
        let response = Self::check_status(table, response).await?;

        let body = response
            .bytes()
            .await
            .map_err(Self::transport_error(table))?;
        let rows: Vec<serde_json::Value> =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                table: table.to_string(),
                source,
            })?;

        // A malformed row only costs that row
        Ok(rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value::<T>(row) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!(
                        "Skipping row {} of `{}` that could not be decoded: {}",
                        index, table, e
                    );
                    None
                }
            })
            .collect())
    }

    pub async fn insert<T: Serialize + ?Sized>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<(), FetchError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(Self::transport_error(table))?;
        Self::check_status(table, response).await?;
        Ok(())
    }
}
