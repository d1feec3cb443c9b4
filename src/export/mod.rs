//! XLSX export pipeline.
//!
//! Produces a complete calendar workbook from a [`CalendarRequest`]: the
//! layout builders fill the worksheet models, each part is serialized to
//! XML, and the parts are stored in a ZIP container.

pub mod drawing;
pub mod package;
pub mod sheet_writer;
pub mod styles;
pub mod zip_writer;

pub use zip_writer::{assemble_archive, assemble_archive_with, ArchivePart, Checksum};

use crate::config::{CalendarRequest, LegendMode, SlotCount};
use crate::error::Result;
use crate::layout::{
    layout_calendar, layout_instructions, layout_tracker, CalendarSpec, CALENDAR_SHEET_NAME,
    INSTRUCTIONS_SHEET_NAME, TRACKER_SHEET_NAME,
};
use crate::types::Sheet;

use package::{PackageOptions, PackagePlan, DRAWING_PART, DRAWING_REL_ID, STYLES_PART};

/// Build the calendar worksheet part on its own.
pub fn build_calendar_sheet(
    year: i32,
    month: u32,
    slots: SlotCount,
    legend_mode: LegendMode,
) -> Result<Vec<u8>> {
    let mut layout = layout_calendar(&CalendarSpec::new(year, month, slots, legend_mode))?;
    if legend_mode == LegendMode::Drawing {
        layout.sheet.drawing_rel_id = Some(DRAWING_REL_ID.to_string());
    }
    Ok(sheet_writer::write_sheet_xml(&layout.sheet).into_bytes())
}

/// Build every archive part for a request, in write order.
pub fn build_parts(request: &CalendarRequest) -> Result<Vec<ArchivePart>> {
    let slots = request.slot_count()?;
    let with_drawing = request.legend_mode == LegendMode::Drawing;

    let plan = PackagePlan::new(&PackageOptions {
        include_instructions: request.include_instructions,
        include_tracker: request.include_tracker,
        include_drawing: with_drawing,
    });

    let mut spec = CalendarSpec::new(request.year, request.month, slots, request.legend_mode);
    spec.conditional_formatting = request.include_conditional_formatting;
    let mut calendar = layout_calendar(&spec)?;
    if with_drawing {
        calendar.sheet.drawing_rel_id = Some(DRAWING_REL_ID.to_string());
    }

    let mut sheets: Vec<(&str, Sheet)> = Vec::with_capacity(3);
    if request.include_instructions {
        sheets.push((INSTRUCTIONS_SHEET_NAME, layout_instructions()));
    }
    let tracker = request
        .include_tracker
        .then(|| layout_tracker(slots, &calendar.legend_label_rows));
    sheets.push((CALENDAR_SHEET_NAME, calendar.sheet));
    if let Some(tracker) = tracker {
        sheets.push((TRACKER_SHEET_NAME, tracker));
    }

    let mut parts = plan.manifest_parts().into_parts();
    parts.push(ArchivePart::new(
        STYLES_PART,
        styles::build_style_table(slots)?,
    ));
    for (name, mut sheet) in sheets {
        let Some(planned) = plan.sheet(name) else {
            continue;
        };
        sheet.tab_color = planned.tab_color.map(str::to_string);
        parts.push(ArchivePart::new(
            planned.part_name.as_str(),
            sheet_writer::write_sheet_xml(&sheet),
        ));
    }
    if with_drawing {
        parts.push(ArchivePart::new(
            DRAWING_PART,
            drawing::build_legend_drawing(slots, request.drawing.as_ref())?,
        ));
    }

    log::debug!(
        "built {} parts for {}-{:02} ({} slots, {:?} legend)",
        parts.len(),
        request.year,
        request.month + 1,
        slots.get(),
        request.legend_mode
    );
    Ok(parts)
}

/// Generate a complete `.xlsx` file for a request.
pub fn build_document(request: &CalendarRequest) -> Result<Vec<u8>> {
    let parts = build_parts(request)?;
    assemble_archive(&parts)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_match_plan() {
        let mut request = CalendarRequest::new(2024, 1, 2);
        request.include_tracker = true;
        request.legend_mode = LegendMode::Drawing;
        let parts = build_parts(&request).unwrap();
        let mut names: Vec<String> = parts.iter().map(|p| p.name.clone()).collect();
        let mut expected = PackagePlan::new(&PackageOptions {
            include_instructions: true,
            include_tracker: true,
            include_drawing: true,
        })
        .part_names();
        names.sort();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_invalid_request_produces_no_bytes() {
        assert!(build_document(&CalendarRequest::new(2024, 12, 2)).is_err());
        assert!(build_document(&CalendarRequest::new(2024, 1, 0)).is_err());
        assert!(build_document(&CalendarRequest::new(2024, 1, 10)).is_err());
    }

    #[test]
    fn test_drawing_mode_calendar_references_drawing() {
        let xml = String::from_utf8(
            build_calendar_sheet(2024, 1, SlotCount::new(2).unwrap(), LegendMode::Drawing)
                .unwrap(),
        )
        .unwrap();
        assert!(xml.contains(r#"<drawing r:id="rId1"/>"#));
        let cells = String::from_utf8(
            build_calendar_sheet(2024, 1, SlotCount::new(2).unwrap(), LegendMode::Cells).unwrap(),
        )
        .unwrap();
        assert!(!cells.contains("<drawing"));
    }
}
