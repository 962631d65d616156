use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;

/// Trait abstraction over the external exchange-rate service.
///
/// The shipped implementation talks to Frankfurter, but the ledger only
/// depends on this trait — if the API stops working or a different rate
/// source is wanted, only the one implementation is replaced.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Conversion rate from `base` to `target` using the most recent
    /// published data.
    async fn latest_rate(&self, base: &str, target: &str) -> Result<f64, CoreError>;

    /// Conversion rate from `base` to `target` as published on `date`.
    async fn historical_rate(
        &self,
        base: &str,
        target: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError>;
}
