use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::providers::frankfurter::FrankfurterProvider;
use crate::providers::traits::RateProvider;

/// Resolves conversion rates from the external rate service, absorbing
/// every failure into `None`.
///
/// Network faults, timeouts, unparseable dates, and missing currencies
/// all come back as `None` — callers hold the fallback policy and never
/// see an error from this layer. Failures are logged so "used fallback"
/// is distinguishable from "got live rate" when auditing.
pub struct RateResolver {
    provider: Box<dyn RateProvider>,
}

impl RateResolver {
    /// Resolver backed by the public Frankfurter API.
    pub fn new() -> Self {
        Self::with_provider(Box::new(FrankfurterProvider::new()))
    }

    /// Resolver backed by any `RateProvider` implementation.
    pub fn with_provider(provider: Box<dyn RateProvider>) -> Self {
        Self { provider }
    }

    /// Rate from `base` to `target` on the day named by `date`.
    ///
    /// `Some(1.0)` without contacting any service when the currencies are
    /// equal. `date` accepts `YYYY-MM-DD`, plus the tolerant `YYYY-MM` and
    /// `YYYY` forms normalized to the first representable day. `None` on
    /// parse failure or any service failure.
    pub async fn historical_rate(&self, base: &str, target: &str, date: &str) -> Option<f64> {
        if base == target {
            return Some(1.0);
        }

        let day = match parse_flexible_date(date) {
            Some(d) => d,
            None => {
                warn!(date, "unparseable date for historical rate lookup");
                return None;
            }
        };

        match self.provider.historical_rate(base, target, day).await {
            Ok(rate) => {
                debug!(provider = self.provider.name(), base, target, %day, rate, "historical rate");
                Some(rate)
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    base,
                    target,
                    %day,
                    error = %e,
                    "historical rate lookup failed"
                );
                None
            }
        }
    }

    /// Most recent available rate from `base` to `target`.
    ///
    /// `Some(1.0)` immediately when the currencies are equal; `None` on
    /// any service failure.
    pub async fn latest_rate(&self, base: &str, target: &str) -> Option<f64> {
        if base == target {
            return Some(1.0);
        }

        match self.provider.latest_rate(base, target).await {
            Ok(rate) => {
                debug!(provider = self.provider.name(), base, target, rate, "latest rate");
                Some(rate)
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    base,
                    target,
                    error = %e,
                    "latest rate lookup failed"
                );
                None
            }
        }
    }
}

impl Default for RateResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a date string, trying the exact-day form first and falling back
/// to year-month and year-only forms (normalized to the first day).
fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01-01"), "%Y-%m-%d") {
        return Some(d);
    }
    None
}
