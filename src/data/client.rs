//! Upstream dataset client
//!
//! Fetches the carbon intensity dataset from its fixed remote location.
//! The dataset is a plain JSON array hosted as a static file, so a fetch is
//! a single GET with no authentication, retries, or pagination.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::CarbonRecord;

/// Fixed location of the upstream carbon intensity dataset
const UPSTREAM_URL: &str =
    "https://raw.githubusercontent.com/open-emissions/data/main/carbon-intensity-by-country.json";

/// Transport timeout for a single fetch attempt
///
/// The upstream file is small; anything slower than this is treated as a
/// failed fetch rather than left to hang a request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when fetching the upstream dataset
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Upstream returned a non-success status
    #[error("Upstream returned status {0}")]
    HttpStatus(reqwest::StatusCode),

    /// Response body was not a valid JSON array of records
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A source of carbon intensity records
///
/// The cache depends on this trait rather than on [`CarbonClient`] directly
/// so tests can inject scripted sources.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetches the full dataset, one attempt, no retries
    async fn fetch_dataset(&self) -> Result<Vec<CarbonRecord>, FetchError>;
}

/// Client for fetching the carbon intensity dataset over HTTPS
#[derive(Debug, Clone)]
pub struct CarbonClient {
    client: Client,
    url: String,
}

impl Default for CarbonClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CarbonClient {
    /// Creates a client pointed at the default upstream URL
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            url: UPSTREAM_URL.to_string(),
        }
    }

    /// Creates a client pointed at a custom dataset URL
    ///
    /// Used by deployments that mirror the dataset, and by tests.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Returns the URL this client fetches from
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DatasetSource for CarbonClient {
    async fn fetch_dataset(&self) -> Result<Vec<CarbonRecord>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }

        let text = response.text().await?;
        let records: Vec<CarbonRecord> = serde_json::from_str(&text)?;
        Ok(records)
    }
}
