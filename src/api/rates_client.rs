// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// A single provider request gets this long; there are no retries.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// What went wrong talking to the rate provider. Callers of the service
/// layer only ever see these collapsed into one "provider unavailable"
/// failure; the variants exist so the log can say which leg failed.
#[derive(Debug, Error)]
pub enum FetchRatesError {
    #[error("transport error talking to the rate provider: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("rate provider returned HTTP {0}")]
    Status(StatusCode),
    #[error("malformed rate provider payload: {0}")]
    Payload(String),
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, Decimal>,
}

#[async_trait::async_trait]
pub trait RatesClientTrait: Send + Sync {
    /// Fetch the full rate table for `base`, mapping currency codes to
    /// base→code multipliers.
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, Decimal>, FetchRatesError>;
}

#[derive(Clone)]
pub struct RatesClient {
    client: Client,
    base_url: String,
}

impl RatesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, PROVIDER_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl RatesClientTrait for RatesClient {
    async fn fetch_rates(&self, base: &str) -> Result<HashMap<String, Decimal>, FetchRatesError> {
        let url = format!("{}/{}", self.base_url, base);
        debug!("requesting rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchRatesError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchRatesError::Status(status));
        }

        let body = response.text().await.map_err(FetchRatesError::Transport)?;
        let parsed: RatesResponse =
            serde_json::from_str(&body).map_err(|e| FetchRatesError::Payload(e.to_string()))?;

        Ok(parsed.rates)
    }
}
