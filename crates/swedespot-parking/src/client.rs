//! HTTP client for the municipal parking open-data endpoint.
//!
//! One GET per call, no retry, no pagination. The whole body must parse as
//! `{ "results": [...] }`; there are no partial results.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::types::{RawRecord, RawResponse};

pub use swedespot_core::DEFAULT_DATASET_URL;

/// Client for the parking dataset.
///
/// Use [`OpenDataClient::new`] for the Södertälje dataset or
/// [`OpenDataClient::with_dataset_url`] to point at another rowstore
/// dataset or a mock server in tests.
pub struct OpenDataClient {
    client: Client,
    dataset_url: Url,
}

impl OpenDataClient {
    /// Creates a client pointed at the Södertälje parking dataset.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        Self::with_dataset_url(DEFAULT_DATASET_URL, timeout_secs, user_agent)
    }

    /// Creates a client for an arbitrary dataset URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`FetchError::InvalidUrl`] if
    /// `dataset_url` does not parse.
    pub fn with_dataset_url(
        dataset_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let dataset_url = Url::parse(dataset_url.trim()).map_err(|e| FetchError::InvalidUrl {
            url: dataset_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            dataset_url,
        })
    }

    #[must_use]
    pub fn dataset_url(&self) -> &Url {
        &self.dataset_url
    }

    /// Fetches every raw record from the dataset in a single request.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network or TLS failure.
    /// - [`FetchError::UnexpectedStatus`] on any non-2xx status.
    /// - [`FetchError::Deserialize`] if the body is not
    ///   `{ "results": [RawRecord] }`.
    pub async fn fetch_raw(&self) -> Result<Vec<RawRecord>, FetchError> {
        let url = self.dataset_url.clone();
        tracing::debug!(%url, "fetching parking dataset");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: RawResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Deserialize {
                context: format!("parking dataset from {url}"),
                source: e,
            })?;

        tracing::info!(
            records = parsed.results.len(),
            bytes = body.len(),
            "fetched parking dataset"
        );
        Ok(parsed.results)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
