use serde::{Deserialize, Serialize};

/// A single expense entry in the ledger.
///
/// Field order is the CSV column order — the writer derives the header
/// from it, so reordering fields changes the file layout.
///
/// **Note on precision**: amounts are stored as `f64` rounded to two
/// fractional digits. For a personal expense ledger this is sufficient,
/// but repeated arithmetic may accumulate small floating-point errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Payment date in `YYYY-MM-DD` form (no time component).
    /// Kept as a string: monthly views match on the `YYYY-MM` prefix,
    /// and imported files round-trip byte-exact.
    pub date: String,

    /// The amount as entered, in the currency actually paid (2 decimals).
    pub base_amount: f64,

    /// 3-letter code of the currency actually paid in.
    pub base_currency: String,

    /// `base_amount * exchange_rate`, rounded to 2 decimals — the value
    /// in the ledger's reporting currency.
    pub amount: f64,

    /// The ledger's reporting currency at last computation time.
    pub target_currency: String,

    /// Spending category. Free-form for import compatibility; UIs offer
    /// the fixed `CATEGORIES` catalog.
    pub category: String,

    /// Rate applied from `base_currency` to `target_currency`.
    pub exchange_rate: f64,

    /// Free-text note, whitespace-trimmed. May be empty.
    pub note: String,
}

impl ExpenseRecord {
    /// Build a record from raw inputs, applying the stored-form invariants:
    /// amounts rounded to 2 decimals, note trimmed,
    /// `amount == round2(base_amount * exchange_rate)`.
    pub fn new(
        date: impl Into<String>,
        base_amount: f64,
        base_currency: impl Into<String>,
        exchange_rate: f64,
        target_currency: impl Into<String>,
        category: impl Into<String>,
        note: &str,
    ) -> Self {
        let base_amount = round2(base_amount);
        Self {
            date: date.into(),
            base_amount,
            base_currency: base_currency.into(),
            amount: round2(base_amount * exchange_rate),
            target_currency: target_currency.into(),
            category: category.into(),
            exchange_rate,
            note: note.trim().to_string(),
        }
    }

    /// Re-derive the converted amount against a new reporting currency.
    /// Used when the ledger's target currency changes: `base_amount`
    /// stays untouched, everything derived from the rate is recomputed.
    pub fn recompute(&mut self, exchange_rate: f64, target_currency: &str) {
        self.exchange_rate = exchange_rate;
        self.amount = round2(self.base_amount * exchange_rate);
        self.target_currency = target_currency.to_string();
    }
}

/// Round to two fractional digits (half away from zero, like `f64::round`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
