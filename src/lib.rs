//! xlcal - Excel calendar workbooks generated in the browser
//!
//! Builds a complete `.xlsx` file client-side via WebAssembly:
//! - Month grid with a ragged event area under each day
//! - Legend as cells or as floating drawing shapes
//! - Conditional formatting that colors entries matching a legend label
//! - Optional instructions and tracker sheets
//! - Stored (uncompressed) ZIP container, no server round-trip
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { generate_calendar } from 'xlcal';
//! await init();
//! const bytes = generate_calendar({ year: 2024, month: 1, eventRows: 3, includeTracker: true });
//! const blob = new Blob([bytes], { type: 'application/vnd.openxmlformats-officedocument.spreadsheetml.sheet' });
//! ```

pub mod cell_ref;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod namespaces;
pub mod types;
pub mod xml;

use wasm_bindgen::prelude::*;

pub use config::{CalendarRequest, DrawingOverrides, LegendMode, SlotCount};
pub use error::{Result, XlcalError};
pub use export::drawing::build_legend_drawing;
pub use export::package::{build_package_manifest_parts, ManifestParts, PackageOptions};
pub use export::styles::build_style_table;
pub use export::{
    assemble_archive, assemble_archive_with, build_calendar_sheet, build_document, build_parts,
    ArchivePart, Checksum,
};

/// Generate a calendar workbook and return the `.xlsx` bytes
///
/// # Arguments
/// * `request` - A `CalendarRequest`-shaped object (camelCase keys)
///
/// # Returns
/// The raw bytes of the generated workbook (a `Uint8Array` in JavaScript)
///
/// # Errors
/// Returns an error string if the request is malformed or describes an
/// impossible month. No partial file is produced.
#[wasm_bindgen]
pub fn generate_calendar(request: JsValue) -> std::result::Result<Vec<u8>, JsValue> {
    console_error_panic_hook::set_once();

    let request: CalendarRequest = serde_wasm_bindgen::from_value(request)
        .map_err(|e| JsValue::from_str(&format!("Invalid request: {e}")))?;

    Ok(build_document(&request)?)
}

/// Generate a calendar workbook from a JSON request string.
///
/// # Errors
/// Returns an error string if the JSON is malformed or generation fails.
#[wasm_bindgen]
pub fn generate_calendar_json(json: &str) -> std::result::Result<Vec<u8>, JsValue> {
    console_error_panic_hook::set_once();

    let request = CalendarRequest::from_json(json)?;
    Ok(build_document(&request)?)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
