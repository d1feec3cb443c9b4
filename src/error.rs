//! Structured error types for xlcal.
//!
//! Every generation step returns [`Result`]; a failure anywhere aborts the
//! whole document so callers never see a partial archive.

/// All errors that can occur while generating a calendar workbook.
#[derive(Debug, thiserror::Error)]
pub enum XlcalError {
    /// Year/month pair the Gregorian calendar cannot represent.
    #[error("Invalid date: year {year}, month index {month}")]
    InvalidDate { year: i32, month: u32 },

    /// Event slot count outside the supported palette range.
    #[error("Invalid event slot count {0} (expected 1..={})", crate::config::SlotCount::MAX)]
    InvalidSlotCount(u32),

    /// A ZIP field would overflow its fixed-width encoding.
    #[error("ZIP archive limit exceeded: {0}")]
    ArchiveLimit(String),

    /// Malformed generation request (JSON).
    #[error("Request: {0}")]
    Request(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlcalError>;

impl From<XlcalError> for wasm_bindgen::JsValue {
    fn from(e: XlcalError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
