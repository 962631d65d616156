use thiserror::Error;

/// Unified error type for the entire expense-ledger-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Rate-service failures are deliberately absent from the caller-facing
/// surface: the resolution layer absorbs them into `None` results and the
/// ledger's fallback chain (never an error). Data-integrity failures
/// (bad CSV, bad indices) always surface.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── File I/O ────────────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── CSV persistence ─────────────────────────────────────────────
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: u64, message: String },

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Index {index} is out of range for {len} records")]
    InvalidIndex { index: usize, len: usize },

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        // The csv crate wraps I/O errors; keep them in the I/O bucket so
        // an unwritable path reports the same way as std::fs failures.
        if e.is_io_error() {
            match e.into_kind() {
                csv::ErrorKind::Io(io) => CoreError::FileIO(io.to_string()),
                other => CoreError::Csv(format!("{other:?}")),
            }
        } else {
            CoreError::Csv(e.to_string())
        }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so
        // currency pairs and any future credentials never leak into logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
