use std::fs::File;
use std::io::{Read, Write};

use crate::errors::CoreError;
use crate::models::record::ExpenseRecord;

/// The persisted-state layout: column names in file order. This is the
/// sole durability mechanism, so the header is part of the contract.
pub const HEADER: [&str; 8] = [
    "date",
    "base_amount",
    "base_currency",
    "amount",
    "target_currency",
    "category",
    "exchange_rate",
    "note",
];

/// High-level persistence operations: save/load the record list to/from
/// CSV files or streams.
///
/// Loading is validate-then-commit: the whole file is parsed into a
/// fresh `Vec` and any malformed field aborts with an error, so a caller
/// never ends up holding partially-corrupt records.
pub struct CsvStore;

impl CsvStore {
    /// Write records as UTF-8, comma-delimited CSV with the mandatory
    /// header row. Stored values are written as-is (amounts keep their
    /// already-rounded stored form).
    pub fn save_to_writer<W: Write>(records: &[ExpenseRecord], writer: W) -> Result<(), CoreError> {
        // Header written explicitly so it appears even for an empty ledger.
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(HEADER)?;
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Save records to a CSV file on disk.
    pub fn save_to_file(records: &[ExpenseRecord], path: &str) -> Result<(), CoreError> {
        let file = File::create(path)?;
        Self::save_to_writer(records, file)
    }

    /// Read records from a CSV stream with the same header contract.
    ///
    /// Columns are resolved by header name. `base_amount` and `amount`
    /// must coerce to numbers; `exchange_rate` defaults to `1.0` when the
    /// column is absent or the field empty. The first malformed numeric
    /// fails the whole load.
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>, CoreError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h == name);
        let required = |name: &str| {
            column(name)
                .ok_or_else(|| CoreError::InvalidFileFormat(format!("missing column '{name}'")))
        };

        let idx_date = required("date")?;
        let idx_base_amount = required("base_amount")?;
        let idx_base_currency = required("base_currency")?;
        let idx_amount = required("amount")?;
        let idx_target_currency = required("target_currency")?;
        let idx_category = required("category")?;
        let idx_note = required("note")?;
        let idx_exchange_rate = column("exchange_rate");

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let text = |idx: usize| row.get(idx).unwrap_or("").to_string();

            let exchange_rate = match idx_exchange_rate.map(|i| row.get(i).unwrap_or("")) {
                Some(field) if !field.is_empty() => parse_number(field, "exchange_rate", line)?,
                _ => 1.0,
            };

            records.push(ExpenseRecord {
                date: text(idx_date),
                base_amount: parse_number(row.get(idx_base_amount).unwrap_or(""), "base_amount", line)?,
                base_currency: text(idx_base_currency),
                amount: parse_number(row.get(idx_amount).unwrap_or(""), "amount", line)?,
                target_currency: text(idx_target_currency),
                category: text(idx_category),
                exchange_rate,
                note: text(idx_note),
            });
        }

        Ok(records)
    }

    /// Load records from a CSV file on disk.
    pub fn load_from_file(path: &str) -> Result<Vec<ExpenseRecord>, CoreError> {
        let file = File::open(path)?;
        Self::load_from_reader(file)
    }
}

fn parse_number(field: &str, name: &str, line: u64) -> Result<f64, CoreError> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|e| CoreError::MalformedRecord {
            line,
            message: format!("{name} '{field}' is not a number: {e}"),
        })
}
