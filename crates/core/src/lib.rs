pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::Utc;
use tracing::warn;

use errors::CoreError;
use models::record::{round2, ExpenseRecord};
use models::settings::LedgerSettings;
use services::rate_service::RateResolver;
use services::report_service::ReportService;
use storage::csv_store::CsvStore;

/// Main entry point for the expense ledger core library.
///
/// Holds the record list, the session currency settings, and the
/// services needed to operate on them. Single-session, single-actor:
/// every operation runs to completion before returning, and rate lookups
/// are bounded by the provider's request timeout.
#[must_use]
pub struct Ledger {
    records: Vec<ExpenseRecord>,
    settings: LedgerSettings,
    /// Last-known base → target rate, used as the final fallback tier
    /// for records paid in the session base currency. 1.0 until a
    /// `refresh_default_rate` succeeds.
    default_rate: f64,
    /// Once true, `set_target_currency` becomes a reporting no-op.
    /// There is no transition back within a session.
    target_currency_locked: bool,
    rate_resolver: RateResolver,
    report_service: ReportService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("records", &self.records.len())
            .field("settings", &self.settings)
            .field("default_rate", &self.default_rate)
            .field("target_currency_locked", &self.target_currency_locked)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Ledger {
    /// Create a brand new empty ledger with the hard-coded session
    /// defaults (SGD base, CNY target, unlocked, no budget).
    pub fn create_new() -> Self {
        Self::with_resolver(RateResolver::new())
    }

    /// Create a ledger backed by a custom rate resolver. This is the
    /// seam for tests and for alternative rate services.
    pub fn with_resolver(rate_resolver: RateResolver) -> Self {
        Self {
            records: Vec::new(),
            settings: LedgerSettings::default(),
            default_rate: 1.0,
            target_currency_locked: false,
            rate_resolver,
            report_service: ReportService::new(),
            dirty: false,
        }
    }

    // ── Record Management ───────────────────────────────────────────

    /// Append a new expense.
    ///
    /// `date` defaults to today (UTC) in `YYYY-MM-DD` form; `base_currency`
    /// defaults to the session base currency. Input validation (positive
    /// amount, sane date) is the caller's contract. The conversion rate is
    /// resolved through the three-tier fallback and never fails, so the
    /// record is always appended.
    pub async fn add(
        &mut self,
        amount: f64,
        category: &str,
        note: &str,
        date: Option<&str>,
        base_currency: Option<&str>,
    ) {
        let base_currency = base_currency
            .unwrap_or(&self.settings.base_currency)
            .to_string();
        let date = match date {
            Some(d) => d.to_string(),
            None => today(),
        };
        let target = self.settings.target_currency.clone();

        let ultimate = if base_currency == self.settings.base_currency {
            self.default_rate
        } else {
            1.0
        };
        let rate = self
            .resolve_rate_or(&base_currency, &target, &date, ultimate)
            .await;

        self.records.push(ExpenseRecord::new(
            date,
            amount,
            base_currency,
            rate,
            target,
            category,
            note,
        ));
        self.dirty = true;
    }

    /// Remove the records at the given 0-based positions (internal order,
    /// not display order).
    ///
    /// Every index is validated against the current length before
    /// anything is deleted — an out-of-range position fails loudly and
    /// mutates nothing. Duplicate indices are collapsed; deletion runs in
    /// descending order so earlier removals never shift later targets.
    pub fn remove_by_indices(&mut self, indices: &[usize]) -> Result<(), CoreError> {
        let len = self.records.len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            return Err(CoreError::InvalidIndex { index: bad, len });
        }

        let mut sorted: Vec<usize> = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        for index in sorted {
            self.records.remove(index);
        }
        if !indices.is_empty() {
            self.dirty = true;
        }
        Ok(())
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    /// Number of records without materializing anything.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    // ── Currency ────────────────────────────────────────────────────

    /// Set the reporting currency. Effective exactly once per session.
    ///
    /// On the first call every existing record's `exchange_rate` and
    /// `amount` are recomputed against the new target through the same
    /// three-tier fallback (ultimate fallback 1.0 — records are always
    /// updated, never skipped), the lock engages, and `true` is returned.
    /// Rates are resolved for all records before any record is mutated,
    /// so callers never observe a half-converted ledger. Once locked the
    /// call mutates nothing and returns `false`.
    pub async fn set_target_currency(&mut self, currency: &str) -> bool {
        if self.target_currency_locked {
            return false;
        }

        let mut rates = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let rate = self
                .resolve_rate_or(&record.base_currency, currency, &record.date, 1.0)
                .await;
            rates.push(rate);
        }

        for (record, rate) in self.records.iter_mut().zip(rates) {
            record.recompute(rate, currency);
        }
        self.settings.target_currency = currency.to_string();
        self.target_currency_locked = true;
        self.dirty = true;
        true
    }

    /// Re-fetch the latest base → target rate and cache it as the
    /// session default. Returns the fetched rate, or `None` when the
    /// service is unreachable (the cached figure is kept in that case).
    pub async fn refresh_default_rate(&mut self) -> Option<f64> {
        let rate = self
            .rate_resolver
            .latest_rate(&self.settings.base_currency, &self.settings.target_currency)
            .await?;
        self.default_rate = rate;
        Some(rate)
    }

    /// Currency assumed for new records when none is specified.
    #[must_use]
    pub fn base_currency(&self) -> &str {
        &self.settings.base_currency
    }

    /// The reporting currency all converted amounts are expressed in.
    #[must_use]
    pub fn target_currency(&self) -> &str {
        &self.settings.target_currency
    }

    /// Whether the reporting currency is locked for this session.
    #[must_use]
    pub fn target_currency_locked(&self) -> bool {
        self.target_currency_locked
    }

    /// Last-known base → target rate (the final fallback tier).
    #[must_use]
    pub fn default_rate(&self) -> f64 {
        self.default_rate
    }

    // ── Monthly Reports ─────────────────────────────────────────────

    /// Total converted spending for the current calendar month.
    #[must_use]
    pub fn total_this_month(&self) -> f64 {
        self.report_service
            .total_for_month(&self.records, &current_month())
    }

    /// Current-month spending by category, largest first. Ties keep
    /// first-encounter order.
    #[must_use]
    pub fn summary_by_category(&self) -> Vec<(String, f64)> {
        self.report_service
            .summary_by_category(&self.records, &current_month())
    }

    /// Current-month spending by day, ascending by date.
    #[must_use]
    pub fn daily_totals_this_month(&self) -> Vec<(String, f64)> {
        self.report_service
            .daily_totals(&self.records, &current_month())
    }

    // ── Budget ──────────────────────────────────────────────────────

    /// Set the budget figure for the current month, denominated in the
    /// target currency. Must be a non-negative number.
    pub fn set_month_budget(&mut self, budget: f64) -> Result<(), CoreError> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Month budget must be a non-negative number, got {budget}"
            )));
        }
        self.settings.month_budget = budget;
        self.dirty = true;
        Ok(())
    }

    /// Current month budget figure.
    #[must_use]
    pub fn month_budget(&self) -> f64 {
        self.settings.month_budget
    }

    /// Budget minus this month's total, rounded to 2 decimals. Negative
    /// when the budget is exceeded.
    #[must_use]
    pub fn remaining_this_month(&self) -> f64 {
        round2(self.settings.month_budget - self.total_this_month())
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Serialize all records to a CSV file. Clears the unsaved-changes
    /// flag on success.
    pub fn save_csv(&mut self, path: &str) -> Result<(), CoreError> {
        CsvStore::save_to_file(&self.records, path)?;
        self.dirty = false;
        Ok(())
    }

    /// Replace the record list wholesale from a CSV file.
    ///
    /// The file is fully parsed before anything is committed, so a
    /// malformed file leaves the prior records, target currency, and lock
    /// state untouched. On success the ledger adopts the first row's
    /// non-empty `target_currency` (or falls back to "CNY") and the
    /// target-currency lock engages regardless of prior state.
    pub fn load_csv(&mut self, path: &str) -> Result<(), CoreError> {
        let records = CsvStore::load_from_file(path)?;

        let target = records
            .first()
            .map(|r| r.target_currency.clone())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "CNY".to_string());

        self.records = records;
        self.settings.target_currency = target;
        self.target_currency_locked = true;
        self.dirty = false;
        Ok(())
    }

    /// Returns `true` if the ledger has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Current session settings.
    #[must_use]
    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Three-tier rate resolution: historical for the record's date,
    /// then latest, then `ultimate`. Never fails — the ledger always
    /// gets a usable positive number.
    async fn resolve_rate_or(&self, base: &str, target: &str, date: &str, ultimate: f64) -> f64 {
        if let Some(rate) = self.rate_resolver.historical_rate(base, target, date).await {
            return rate;
        }
        if let Some(rate) = self.rate_resolver.latest_rate(base, target).await {
            return rate;
        }
        warn!(base, target, date, rate = ultimate, "rate service unavailable, using fallback rate");
        ultimate
    }
}

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}
