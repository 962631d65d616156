use serde::{Deserialize, Serialize};

/// Spending categories offered by UI collaborators. Stored category
/// strings are not restricted to this list (imported files may carry
/// anything), but pickers default to it.
pub const CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Groceries",
    "Rent",
    "Utilities",
    "Entertainment",
    "Shopping",
    "Health",
    "Education",
    "Other",
];

/// Currency codes the ledger offers out of the box.
pub const CURRENCIES: &[&str] = &[
    "USD", "CNY", "SGD", "EUR", "GBP", "JPY", "AUD", "CAD", "HKD", "KRW", "INR", "MYR", "IDR",
];

/// Per-session ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    /// Currency assumed for new records when none is specified.
    /// Fixed for the lifetime of the session.
    pub base_currency: String,

    /// The reporting currency all converted amounts are expressed in.
    /// Settable exactly once per session (see `Ledger::set_target_currency`).
    pub target_currency: String,

    /// Budget figure for the current calendar month, denominated in the
    /// target currency. Non-negative.
    pub month_budget: f64,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            base_currency: "SGD".to_string(),
            target_currency: "CNY".to_string(),
            month_budget: 0.0,
        }
    }
}
