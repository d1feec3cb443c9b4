//! Generation request and feature configuration.
//!
//! The UI sends one [`CalendarRequest`] (from JavaScript via
//! `serde-wasm-bindgen`, or from a JSON file in the CLI) and gets back
//! the finished archive bytes.

use serde::{Deserialize, Serialize};

use crate::error::{Result, XlcalError};

/// Number of per-day event rows, which is also the number of legend entries.
///
/// Layout, style table, drawing and tracker all index by slot position, so
/// the same value must reach each of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SlotCount(u32);

impl SlotCount {
    pub const MIN: u32 = 1;
    /// Bounded by the legend palette size
    pub const MAX: u32 = 9;

    pub fn new(n: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(XlcalError::InvalidSlotCount(n))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based slot positions.
    pub fn slots(self) -> std::ops::Range<u32> {
        0..self.0
    }
}

impl TryFrom<u32> for SlotCount {
    type Error = XlcalError;

    fn try_from(n: u32) -> Result<Self> {
        Self::new(n)
    }
}

/// How the legend is rendered on the calendar sheet.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum LegendMode {
    /// Legend title, labels and color swatches are ordinary cells
    #[default]
    Cells,
    /// Title and swatches are floating shapes in a drawing part
    Drawing,
}

/// Caller overrides for the legend drawing geometry.
///
/// Columns are 0-based drawing anchor columns; lengths are inches.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingOverrides {
    pub panel_col: Option<u32>,
    pub pill_col: Option<u32>,
    pub col_offset_in: Option<f64>,
    pub row_offset_in: Option<f64>,
    pub panel_width_in: Option<f64>,
    pub pill_width_in: Option<f64>,
    pub pill_height_in: Option<f64>,
    pub row_height_in: Option<f64>,
}

/// A complete document-generation request.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarRequest {
    pub year: i32,
    /// Zero-based month (0 = January)
    pub month: u32,
    /// Event rows per day / legend entries (1..=9)
    pub event_rows: u32,
    pub legend_mode: LegendMode,
    pub include_tracker: bool,
    pub include_conditional_formatting: bool,
    pub include_instructions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawing: Option<DrawingOverrides>,
}

impl Default for CalendarRequest {
    fn default() -> Self {
        Self {
            year: 2024,
            month: 0,
            event_rows: 1,
            legend_mode: LegendMode::Cells,
            include_tracker: false,
            include_conditional_formatting: true,
            include_instructions: true,
            drawing: None,
        }
    }
}

impl CalendarRequest {
    pub fn new(year: i32, month: u32, event_rows: u32) -> Self {
        Self {
            year,
            month,
            event_rows,
            ..Self::default()
        }
    }

    /// Parse a request from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a request from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn slot_count(&self) -> Result<SlotCount> {
        SlotCount::new(self.event_rows)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_count_bounds() {
        assert!(SlotCount::new(0).is_err());
        assert_eq!(SlotCount::new(1).unwrap().get(), 1);
        assert_eq!(SlotCount::new(9).unwrap().slots().count(), 9);
        assert!(matches!(
            SlotCount::new(10),
            Err(XlcalError::InvalidSlotCount(10))
        ));
    }

    #[test]
    fn test_request_from_camel_case_json() {
        let request = CalendarRequest::from_json(
            r#"{"year":2025,"month":11,"eventRows":3,"legendMode":"drawing","includeTracker":true,
                "drawing":{"pillCol":11,"colOffsetIn":0.1}}"#,
        )
        .unwrap();
        assert_eq!(request.year, 2025);
        assert_eq!(request.month, 11);
        assert_eq!(request.legend_mode, LegendMode::Drawing);
        assert!(request.include_tracker);
        // Omitted fields keep their defaults
        assert!(request.include_conditional_formatting);
        let drawing = request.drawing.unwrap();
        assert_eq!(drawing.pill_col, Some(11));
        assert_eq!(drawing.panel_col, None);
    }

    #[test]
    fn test_request_file_round_trip() {
        let path = std::env::temp_dir().join(format!("xlcal-request-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"year":2026,"month":7,"eventRows":4}"#).unwrap();
        let request = CalendarRequest::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(request.year, 2026);
        assert_eq!(request.slot_count().unwrap().get(), 4);
    }

    #[test]
    fn test_missing_request_file_is_io_error() {
        let err = CalendarRequest::from_json_file("/nonexistent/xlcal/request.json").unwrap_err();
        assert!(matches!(err, XlcalError::Io(_)));
        assert!(err.to_string().starts_with("I/O error: "));
    }

    #[test]
    fn test_malformed_request_is_an_error() {
        assert!(matches!(
            CalendarRequest::from_json("{\"year\": \"soon\"}"),
            Err(XlcalError::Request(_))
        ));
    }
}
