//! Published Spreadsheet Source
//!
//! Fetches a spreadsheet exported as CSV ("publish to web") and normalizes
//! its rows. One request per load; no retries, no caching.

use std::time::Duration;

use async_trait::async_trait;

use super::ConcertSource;
use crate::calendar::today;
use crate::error::{DataError, Result};
use crate::model::Concert;
use crate::normalize::concerts_from_csv;

/// Spreadsheet source configuration
#[derive(Clone, Debug)]
pub struct SpreadsheetConfig {
    /// Published CSV URL
    pub url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SpreadsheetConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 10,
        }
    }
}

/// Loads concerts from a published CSV export
pub struct SpreadsheetSource {
    client: reqwest::Client,
    config: SpreadsheetConfig,
}

impl SpreadsheetSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::from_config(SpreadsheetConfig::new(url))
    }

    pub fn from_config(config: SpreadsheetConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn fetch(&self) -> Result<String> {
        let response = self.client.get(&self.config.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Fetch {
                url: self.config.url.clone(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ConcertSource for SpreadsheetSource {
    async fn load(&self) -> Result<Vec<Concert>> {
        let body = self.fetch().await.inspect_err(|e| {
            tracing::error!(url = %self.config.url, error = %e, "Spreadsheet fetch failed");
        })?;

        Ok(concerts_from_csv(&body, today()))
    }

    fn name(&self) -> &str {
        "spreadsheet"
    }
}
