use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::traits::RateProvider;
use crate::errors::CoreError;

const BASE_URL: &str = "https://api.frankfurter.app";

/// Each request is bounded so a dead network never blocks the ledger
/// for longer than this.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Frankfurter API provider for fiat currency exchange rates.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) data.
/// - **Coverage**: ~30+ currencies (EUR, USD, SGD, CNY, GBP, JPY, etc.)
/// - **Endpoints**: `/latest?from=&to=`, `/{date}?from=&to=`
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at a different host. Used by tests to target a
    /// local stub server; any service speaking the same contract works.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn fetch_rate(&self, url: &str, base: &str, target: &str) -> Result<f64, CoreError> {
        let resp: RatesResponse = self
            .client
            .get(url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse response for {base}/{target}: {e}"),
            })?;

        let rate = resp
            .rates
            .get(target)
            .copied()
            .ok_or_else(|| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("No rate found for {base} → {target}"),
            })?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Unusable rate {rate} for {base} → {target}"),
            });
        }

        Ok(rate)
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Frankfurter API response types ──────────────────────────────────

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "Frankfurter"
    }

    async fn latest_rate(&self, base: &str, target: &str) -> Result<f64, CoreError> {
        let base = base.to_uppercase();
        let target = target.to_uppercase();

        let url = format!("{}/latest?from={base}&to={target}", self.base_url);
        self.fetch_rate(&url, &base, &target).await
    }

    async fn historical_rate(
        &self,
        base: &str,
        target: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        let base = base.to_uppercase();
        let target = target.to_uppercase();

        let date_str = date.format("%Y-%m-%d");
        let url = format!("{}/{date_str}?from={base}&to={target}", self.base_url);
        self.fetch_rate(&url, &base, &target).await
    }
}
