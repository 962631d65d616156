// ═══════════════════════════════════════════════════════════════════
// Integration Tests — full session flows through the Ledger facade
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tempfile::TempDir;

use expense_ledger_core::errors::CoreError;
use expense_ledger_core::models::record::round2;
use expense_ledger_core::providers::traits::RateProvider;
use expense_ledger_core::services::rate_service::RateResolver;
use expense_ledger_core::Ledger;

struct MockRateProvider {
    historical: HashMap<(String, String, String), f64>,
    latest: HashMap<(String, String), f64>,
}

impl MockRateProvider {
    fn new() -> Self {
        let mut historical = HashMap::new();
        historical.insert(("SGD".into(), "CNY".into(), "2025-01-15".into()), 5.3);
        historical.insert(("SGD".into(), "CNY".into(), "2025-01-16".into()), 5.35);
        historical.insert(("USD".into(), "CNY".into(), "2025-01-16".into()), 7.1);
        historical.insert(("SGD".into(), "USD".into(), "2025-01-15".into()), 0.75);
        historical.insert(("SGD".into(), "USD".into(), "2025-01-16".into()), 0.76);
        historical.insert(("USD".into(), "USD".into(), "2025-01-16".into()), 1.0);

        let mut latest = HashMap::new();
        latest.insert(("SGD".into(), "CNY".into()), 5.4);

        Self { historical, latest }
    }
}

#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    async fn latest_rate(&self, base: &str, target: &str) -> Result<f64, CoreError> {
        self.latest
            .get(&(base.to_string(), target.to_string()))
            .copied()
            .ok_or_else(|| CoreError::Api {
                provider: "MockProvider".into(),
                message: format!("No rate found for {base} → {target}"),
            })
    }

    async fn historical_rate(
        &self,
        base: &str,
        target: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        let key = (
            base.to_string(),
            target.to_string(),
            date.format("%Y-%m-%d").to_string(),
        );
        self.historical.get(&key).copied().ok_or_else(|| CoreError::Api {
            provider: "MockProvider".into(),
            message: format!("No rate found for {base} → {target} on {date}"),
        })
    }
}

fn mock_ledger() -> Ledger {
    Ledger::with_resolver(RateResolver::with_provider(Box::new(MockRateProvider::new())))
}

#[tokio::test]
async fn full_session_record_convert_save_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.csv");
    let path = path.to_str().unwrap();

    // Record expenses in two currencies against the default CNY target.
    let mut ledger = mock_ledger();
    ledger.add(100.0, "Food", "lunch", Some("2025-01-15"), None).await;
    ledger.add(20.0, "Transport", "taxi", Some("2025-01-16"), Some("USD")).await;
    assert_eq!(ledger.records()[0].amount, 530.0);
    assert_eq!(ledger.records()[1].amount, 142.0);

    // Lock the session onto USD; every record is reconverted.
    assert!(ledger.set_target_currency("USD").await);
    assert_eq!(ledger.records()[0].amount, 75.0);
    assert_eq!(ledger.records()[1].amount, 20.0);
    for r in ledger.records() {
        assert_eq!(r.amount, round2(r.base_amount * r.exchange_rate));
        assert_eq!(r.target_currency, "USD");
    }

    // Persist, then restore into a fresh session.
    ledger.save_csv(path).unwrap();
    assert!(!ledger.has_unsaved_changes());

    let mut restored = mock_ledger();
    restored.load_csv(path).unwrap();

    assert_eq!(restored.records(), ledger.records());
    assert_eq!(restored.target_currency(), "USD");
    assert!(restored.target_currency_locked());
    assert!(!restored.has_unsaved_changes());

    // The lock carried over from the import: no second switch.
    assert!(!restored.set_target_currency("EUR").await);
    assert_eq!(restored.target_currency(), "USD");
}

#[tokio::test]
async fn edit_session_after_import() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.csv");
    let path = path.to_str().unwrap();

    let mut ledger = mock_ledger();
    ledger.add(100.0, "Food", "", Some("2025-01-15"), None).await;
    ledger.add(20.0, "Food", "", Some("2025-01-16"), None).await;
    ledger.add(30.0, "Rent", "", Some("2025-01-16"), None).await;
    ledger.save_csv(path).unwrap();

    let mut ledger = mock_ledger();
    ledger.load_csv(path).unwrap();
    assert_eq!(ledger.record_count(), 3);

    // Keep working in the restored session: delete and append.
    ledger.remove_by_indices(&[2, 0]).unwrap();
    assert_eq!(ledger.record_count(), 1);
    assert_eq!(ledger.records()[0].base_amount, 20.0);

    ledger.add(40.0, "Food", "", Some("2025-01-15"), None).await;
    assert_eq!(ledger.record_count(), 2);
    assert!(ledger.has_unsaved_changes());
}

#[tokio::test]
async fn monthly_view_consistency() {
    let mut ledger = mock_ledger();
    let month = chrono::Utc::now().format("%Y-%m").to_string();

    // Current-month records resolve through the latest tier (5.4).
    ledger.add(10.0, "Food", "", Some(&format!("{month}-01")), None).await;
    ledger.add(20.0, "Rent", "", Some(&format!("{month}-01")), None).await;
    ledger.add(30.0, "Food", "", Some(&format!("{month}-07")), None).await;
    // Outside the month: must not appear in any view.
    ledger.add(1000.0, "Food", "", Some("2020-12-31"), None).await;

    let total = ledger.total_this_month();
    assert_eq!(total, round2(60.0 * 5.4));

    let summary = ledger.summary_by_category();
    assert_eq!(summary[0].0, "Food");
    let summary_sum: f64 = summary.iter().map(|(_, v)| v).sum();
    assert!((total - summary_sum).abs() < 1e-9);

    let daily = ledger.daily_totals_this_month();
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0].0, format!("{month}-01"));
    assert_eq!(daily[1].0, format!("{month}-07"));
    let daily_sum: f64 = daily.iter().map(|(_, v)| v).sum();
    assert!((total - daily_sum).abs() < 1e-9);

    ledger.set_month_budget(500.0).unwrap();
    assert_eq!(
        ledger.remaining_this_month(),
        round2(500.0 - total)
    );
}
