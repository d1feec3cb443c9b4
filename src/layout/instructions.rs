//! Static `Instructions` sheet placed before the calendar.

use crate::cell_ref::CellRange;
use crate::export::styles::StyleId;
use crate::types::{Cell, ColumnWidth, Sheet};

pub const INSTRUCTIONS_SHEET_NAME: &str = "Instructions";

const LAST_COL: u32 = 8;
const NOTE_LAST_ROW: u32 = 25;

const TITLE: &str = "\u{1F4C5} How to Use This Calendar Workbook";

const NOTE: &str = "\
This workbook highlights calendar entries with conditional formatting.

Features:
- Enter your own values in the Legend column (right side of the Calendar sheet)
- Type matching text in calendar cells and they pick up the legend color
- The optional Tracker sheet counts how often each legend value is used

Quick start:
1. Replace \"Enter Value Here\" in the Legend with your own labels (Gym, Meeting, Holiday, ...)
2. Type those same labels in the calendar event cells
3. Matching cells are highlighted automatically
4. Check the Tracker sheet (if included) for the counts

Tip: matching is case-insensitive (gym = Gym = GYM)";

/// Build the instructions sheet: a merged title over `A1:H1` and a merged
/// wrapped note over `A2:H25`.
pub fn layout_instructions() -> Sheet {
    let mut sheet = Sheet::new(INSTRUCTIONS_SHEET_NAME);
    sheet.set_columns(vec![ColumnWidth::new(1, LAST_COL, 15.0)]);

    sheet.add_merged_cell(
        Cell::text(1, 1, TITLE)
            .with_style(StyleId::TITLE)
            .merge_across(LAST_COL - 1),
    );
    // Covered cells carry the style so the bottom border spans the merge
    for col in 2..=LAST_COL {
        sheet.set_cell(Cell::blank(col, 1).with_style(StyleId::TITLE));
    }

    sheet.set_cell(Cell::text(1, 2, NOTE).with_style(StyleId::NOTE));
    sheet.add_merge(CellRange::new(1, 2, LAST_COL, NOTE_LAST_ROW));

    sheet
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_instructions_layout() {
        let sheet = layout_instructions();
        let merges: Vec<String> = sheet.merges.iter().map(ToString::to_string).collect();
        assert_eq!(merges, vec!["A1:H1", "A2:H25"]);
        assert_eq!(sheet.row(1).unwrap().len(), 8);
        assert_eq!(sheet.cell(1, 2).unwrap().style, StyleId::NOTE);
        assert!(sheet.conditional_formatting.is_empty());
    }
}
