//! Optional `Tracker` sheet counting legend values used in the calendar.

use crate::cell_ref::cell_ref;
use crate::config::SlotCount;
use crate::export::styles::StyleId;
use crate::types::{Cell, ColumnWidth, Sheet};

use super::calendar::{CALENDAR_SHEET_NAME, LEGEND_LABEL_COL};

pub const TRACKER_SHEET_NAME: &str = "Tracker";

const HEADERS: [&str; 3] = ["Legend Value", "Count", "Description"];
const DESCRIPTION: &str = "Automatically counted from Calendar sheet";

/// Build the tracker sheet.
///
/// `legend_label_rows` are the calendar rows holding each slot's label, as
/// reported by the calendar layout, so the formulas follow the legend in
/// either legend mode.
pub fn layout_tracker(slots: SlotCount, legend_label_rows: &[u32]) -> Sheet {
    let mut sheet = Sheet::new(TRACKER_SHEET_NAME);
    sheet.set_columns(vec![
        ColumnWidth::single(1, 20.0),
        ColumnWidth::single(2, 8.0),
        ColumnWidth::single(3, 35.0),
    ]);

    for (col, header) in (1..).zip(HEADERS) {
        sheet.set_cell(Cell::text(col, 1, header).with_style(StyleId::BOLD));
    }

    for ((slot, &label_row), row) in slots.slots().zip(legend_label_rows).zip(2..) {
        let label = format!(
            "{CALENDAR_SHEET_NAME}!{}",
            cell_ref(LEGEND_LABEL_COL, label_row)
        );
        sheet.set_cell(Cell::formula(1, row, label.as_str()));
        sheet.set_cell(Cell::formula(
            2,
            row,
            format!("COUNTIF({CALENDAR_SHEET_NAME}!A:G,{label})"),
        ));
        sheet.set_cell(Cell::text(3, row, DESCRIPTION).with_style(StyleId::swatch(slot)));
    }

    sheet
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
    use crate::types::CellType;

    #[test]
    fn test_tracker_formulas_follow_label_rows() {
        let sheet = layout_tracker(SlotCount::new(2).unwrap(), &[2, 4]);
        let a3 = sheet.cell(1, 3).unwrap();
        assert_eq!(a3.formula.as_deref(), Some("Calendar!I4"));
        assert_eq!(a3.cell_type, CellType::Str);
        assert_eq!(
            sheet.cell(2, 2).unwrap().formula.as_deref(),
            Some("COUNTIF(Calendar!A:G,Calendar!I2)")
        );
        assert_eq!(sheet.cell(3, 3).unwrap().style, StyleId::swatch(1));
        assert_eq!(sheet.max_row(), Some(3));
    }

    #[test]
    fn test_tracker_header() {
        let sheet = layout_tracker(SlotCount::new(1).unwrap(), &[2]);
        let headers: Vec<String> = sheet
            .row(1)
            .unwrap()
            .cells()
            .map(|c| format!("{:?}", c.value))
            .collect();
        assert_eq!(headers.len(), 3);
        assert!(headers[0].contains("Legend Value"));
        assert!(sheet.row(1).unwrap().cells().all(|c| c.style == StyleId::BOLD));
    }
}
