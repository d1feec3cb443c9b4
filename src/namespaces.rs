//! XML namespace, relationship-type and content-type constants for the
//! generated package.
//!
//! Only the Transitional conformance URIs are emitted; Excel, LibreOffice
//! and Google Sheets all open them.

// =============================================================================
// Spreadsheet namespaces
// =============================================================================

/// Main spreadsheet namespace (Transitional conformance)
pub const NS_SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Office document relationships namespace (the `r:` prefix)
pub const NS_OFFICE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

// =============================================================================
// Package namespaces
// =============================================================================

/// Relationships namespace
pub const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Content types namespace
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

// =============================================================================
// Drawing namespaces
// =============================================================================

/// DrawingML main namespace
pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// DrawingML spreadsheet drawing namespace
pub const NS_DRAWING_SPREADSHEET: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";

// =============================================================================
// Relationship types
// =============================================================================

/// Relationship type for the workbook (from root .rels)
pub const REL_WORKBOOK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Relationship type for worksheets
pub const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

/// Relationship type for styles
pub const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

/// Relationship type for a sheet's drawing part
pub const REL_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";

// =============================================================================
// Content types
// =============================================================================

pub const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

pub const CT_XML: &str = "application/xml";

pub const CT_WORKBOOK: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

pub const CT_WORKSHEET: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

pub const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

pub const CT_DRAWING: &str = "application/vnd.openxmlformats-officedocument.drawing+xml";
