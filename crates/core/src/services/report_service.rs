use crate::models::record::{round2, ExpenseRecord};

/// Monthly aggregation over the record list.
///
/// Pure business logic — no I/O, no API calls. Month selection is a
/// `YYYY-MM` string-prefix match against record dates, so records carry
/// their month regardless of how the rest of the date is formed.
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    /// Sum of converted amounts for records in `month`, rounded to
    /// 2 decimals. `0.00` when nothing matches.
    pub fn total_for_month(&self, records: &[ExpenseRecord], month: &str) -> f64 {
        round2(
            records
                .iter()
                .filter(|r| r.date.starts_with(month))
                .map(|r| r.amount)
                .sum(),
        )
    }

    /// Converted amounts for `month` aggregated by category, sorted by
    /// descending total. Ties keep first-encounter order (stable sort).
    pub fn summary_by_category(
        &self,
        records: &[ExpenseRecord],
        month: &str,
    ) -> Vec<(String, f64)> {
        let mut sums: Vec<(String, f64)> = Vec::new();

        for record in records.iter().filter(|r| r.date.starts_with(month)) {
            match sums.iter_mut().find(|(cat, _)| *cat == record.category) {
                Some((_, total)) => *total += record.amount,
                None => sums.push((record.category.clone(), record.amount)),
            }
        }

        for (_, total) in &mut sums {
            *total = round2(*total);
        }
        sums.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        sums
    }

    /// Converted amounts for `month` aggregated by date, sorted ascending
    /// by date string.
    pub fn daily_totals(&self, records: &[ExpenseRecord], month: &str) -> Vec<(String, f64)> {
        let mut sums: Vec<(String, f64)> = Vec::new();

        for record in records.iter().filter(|r| r.date.starts_with(month)) {
            match sums.iter_mut().find(|(date, _)| *date == record.date) {
                Some((_, total)) => *total += record.amount,
                None => sums.push((record.date.clone(), record.amount)),
            }
        }

        for (_, total) in &mut sums {
            *total = round2(*total);
        }
        sums.sort_by(|a, b| a.0.cmp(&b.0));
        sums
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}
