//! Calendar grid layout.
//!
//! Row plan for the `Calendar` sheet:
//! - row 1: month title `A1:G1`, legend title `I1:J1` (cell mode)
//! - row 2: weekday names in A-G
//! - rows 2.. : legend labels in I (and swatches in J in cell mode)
//! - rows 3.. : week rows of day numbers, each followed by one event row per
//!   slot under the columns that held a real day

use crate::cell_ref::{absolute_ref, CellRange};
use crate::config::{LegendMode, SlotCount};
use crate::error::Result;
use crate::export::styles::{dxf_index, StyleId};
use crate::types::{Cell, ColumnWidth, ConditionalFormattingRule, Sheet};

use super::dates::{month_facts, month_title, WEEKDAY_NAMES};

pub const CALENDAR_SHEET_NAME: &str = "Calendar";

pub(crate) const TITLE_ROW: u32 = 1;
const WEEKDAY_ROW: u32 = 2;
const GRID_START_ROW: u32 = 3;
const DAYS_PER_WEEK: u32 = 7;

/// Column holding the editable legend labels (I).
pub(crate) const LEGEND_LABEL_COL: u32 = 9;
/// Column holding the legend swatches (J).
const LEGEND_SWATCH_COL: u32 = 10;

const LEGEND_TITLE: &str = "Legend";
pub(crate) const LEGEND_PLACEHOLDER: &str = "Enter Value Here";

/// Inputs to [`layout_calendar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarSpec {
    pub year: i32,
    /// Zero-based month (0 = January)
    pub month: u32,
    pub slots: SlotCount,
    pub legend_mode: LegendMode,
    pub conditional_formatting: bool,
}

impl CalendarSpec {
    pub fn new(year: i32, month: u32, slots: SlotCount, legend_mode: LegendMode) -> Self {
        Self {
            year,
            month,
            slots,
            legend_mode,
            conditional_formatting: true,
        }
    }
}

/// A populated calendar sheet plus the positions other parts depend on.
#[derive(Debug, Clone)]
pub struct CalendarLayout {
    pub sheet: Sheet,
    /// Row of each slot's label cell in column I, by slot
    pub legend_label_rows: Vec<u32>,
    /// Event area covered by the highlight rules
    pub body_range: Option<CellRange>,
    /// Weekday of day 1, 0 = Sunday
    pub first_weekday: u32,
    pub days_in_month: u32,
}

impl CalendarLayout {
    /// Absolute reference of a slot's label cell, e.g. `$I$2`.
    pub fn legend_label_ref(&self, slot: u32) -> Option<String> {
        let idx = usize::try_from(slot).ok()?;
        self.legend_label_rows
            .get(idx)
            .map(|&row| absolute_ref(LEGEND_LABEL_COL, row))
    }
}

/// Row of a slot's legend label.
///
/// Cell mode stacks labels directly under the legend title; drawing mode
/// puts each label on its pill's row, which skips a spacer row per slot.
pub(crate) fn legend_label_row(mode: LegendMode, slot: u32) -> u32 {
    match mode {
        LegendMode::Cells => TITLE_ROW + 1 + slot,
        LegendMode::Drawing => TITLE_ROW + 1 + 2 * slot,
    }
}

fn calendar_columns() -> Vec<ColumnWidth> {
    vec![
        ColumnWidth::new(1, DAYS_PER_WEEK, 13.0),
        ColumnWidth::single(8, 3.0),
        ColumnWidth::single(LEGEND_LABEL_COL, 18.0),
        ColumnWidth::single(LEGEND_SWATCH_COL, 7.0),
    ]
}

/// Build the calendar sheet for one month.
pub fn layout_calendar(spec: &CalendarSpec) -> Result<CalendarLayout> {
    let facts = month_facts(spec.year, spec.month)?;
    let title = month_title(spec.year, spec.month)?;
    let event_rows = spec.slots.get();

    let mut sheet = Sheet::new(CALENDAR_SHEET_NAME);
    sheet.set_columns(calendar_columns());

    // Header row
    sheet.add_merged_cell(
        Cell::text(1, TITLE_ROW, title)
            .with_style(StyleId::TITLE)
            .merge_across(DAYS_PER_WEEK - 1),
    );

    // Legend block
    let mut legend_label_rows = Vec::with_capacity(spec.slots.slots().len());
    if spec.legend_mode == LegendMode::Cells {
        sheet.add_merged_cell(
            Cell::text(LEGEND_LABEL_COL, TITLE_ROW, LEGEND_TITLE)
                .with_style(StyleId::LEGEND_HEADER)
                .merge_across(LEGEND_SWATCH_COL - LEGEND_LABEL_COL),
        );
    }
    for slot in spec.slots.slots() {
        let row = legend_label_row(spec.legend_mode, slot);
        sheet.set_cell(
            Cell::text(LEGEND_LABEL_COL, row, LEGEND_PLACEHOLDER).with_style(StyleId::BORDER),
        );
        if spec.legend_mode == LegendMode::Cells {
            sheet.set_cell(
                Cell::blank(LEGEND_SWATCH_COL, row).with_style(StyleId::swatch(slot)),
            );
        }
        legend_label_rows.push(row);
    }

    // Weekday header
    for (col, name) in (1..=DAYS_PER_WEEK).zip(WEEKDAY_NAMES) {
        sheet.set_cell(Cell::text(col, WEEKDAY_ROW, name).with_style(StyleId::BOLD_BORDER));
    }

    // Day grid
    let mut current_row = GRID_START_ROW;
    let mut last_grid_row = None;
    let mut day = 1;
    let mut first_week = true;
    while day <= facts.days_in_month {
        let mut day_cols = Vec::with_capacity(7);
        for dow in 0..DAYS_PER_WEEK {
            if (first_week && dow < facts.first_weekday) || day > facts.days_in_month {
                continue;
            }
            let col = dow + 1;
            sheet.set_cell(Cell::number(col, current_row, day).with_style(StyleId::BORDER));
            day_cols.push(col);
            day += 1;
        }
        first_week = false;
        last_grid_row = Some(current_row);

        // Event rows only under real days
        if !day_cols.is_empty() {
            for _ in 0..event_rows {
                current_row += 1;
                for &col in &day_cols {
                    sheet.set_cell(Cell::blank(col, current_row).with_style(StyleId::BORDER));
                }
                last_grid_row = Some(current_row);
            }
        }
        current_row += 1;
    }

    let body_range = last_grid_row
        .filter(|&last| last > GRID_START_ROW)
        .map(|last| CellRange::new(1, GRID_START_ROW + 1, DAYS_PER_WEEK, last));

    log::debug!(
        "calendar {}-{:02}: {} days, first weekday {}, grid rows {}..={}",
        spec.year,
        spec.month + 1,
        facts.days_in_month,
        facts.first_weekday,
        GRID_START_ROW,
        last_grid_row.unwrap_or(GRID_START_ROW)
    );

    // Highlight rules, one per slot
    if spec.conditional_formatting {
        if let Some(range) = body_range {
            let sqref = range.to_string();
            let top_left = range.top_left();
            for (slot, &label_row) in spec.slots.slots().zip(&legend_label_rows) {
                let formula = format!(
                    "UPPER({top_left})=UPPER({})",
                    absolute_ref(LEGEND_LABEL_COL, label_row)
                );
                log::debug!("highlight rule {}: {sqref} {formula}", slot + 1);
                sheet.add_conditional_formatting(ConditionalFormattingRule::expression(
                    sqref.as_str(),
                    formula,
                    slot + 1,
                    dxf_index(slot),
                ));
            }
        }
    }

    Ok(CalendarLayout {
        sheet,
        legend_label_rows,
        body_range,
        first_weekday: facts.first_weekday,
        days_in_month: facts.days_in_month,
    })
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
    use crate::types::CellValue;

    fn layout(year: i32, month: u32, slots: u32, mode: LegendMode) -> CalendarLayout {
        let spec = CalendarSpec::new(year, month, SlotCount::new(slots).unwrap(), mode);
        layout_calendar(&spec).unwrap()
    }

    #[test]
    fn test_february_2024_title_and_first_day() {
        let cal = layout(2024, 1, 2, LegendMode::Cells);
        let title = cal.sheet.cell(1, 1).unwrap();
        assert_eq!(title.value, CellValue::from("FEBRUARY 2024"));
        assert_eq!(title.style, StyleId::TITLE);
        assert_eq!(cal.first_weekday, 4);
        assert_eq!(cal.days_in_month, 29);

        // Thursday is the fifth column
        assert_eq!(cal.sheet.cell(5, 3).unwrap().value, CellValue::Number(1.0));
        assert!(cal.sheet.cell(4, 3).is_none());
        let merges: Vec<String> = cal.sheet.merges.iter().map(ToString::to_string).collect();
        assert_eq!(merges, vec!["A1:G1", "I1:J1"]);
    }

    #[test]
    fn test_every_day_appears_once() {
        let cal = layout(2024, 1, 3, LegendMode::Cells);
        let mut days: Vec<f64> = cal
            .sheet
            .cells()
            .filter(|c| c.row >= GRID_START_ROW && c.col <= DAYS_PER_WEEK)
            .filter_map(|c| match c.value {
                CellValue::Number(n) => Some(n),
                _ => None,
            })
            .collect();
        days.sort_by(f64::total_cmp);
        let expected: Vec<f64> = (1..=29).map(f64::from).collect();
        assert_eq!(days, expected);
    }

    #[test]
    fn test_ragged_last_week() {
        // Feb 2024: last week row holds 25..29 in A-E
        let cal = layout(2024, 1, 1, LegendMode::Cells);
        let last_week_row = 3 + 4 * 2;
        assert_eq!(cal.sheet.cell(1, last_week_row).unwrap().value, CellValue::Number(25.0));
        let event_row = cal.sheet.row(last_week_row + 1).unwrap();
        let cols: Vec<u32> = event_row.cells().map(|c| c.col).collect();
        assert_eq!(cols, vec![1, 2, 3, 4, 5]);
        assert_eq!(cal.sheet.max_row(), Some(last_week_row + 1));
    }

    #[test]
    fn test_ragged_first_week() {
        let cal = layout(2024, 1, 2, LegendMode::Cells);
        for row in [4, 5] {
            let cols: Vec<u32> = cal
                .sheet
                .row(row)
                .unwrap()
                .cells()
                .filter(|c| c.col <= DAYS_PER_WEEK)
                .map(|c| c.col)
                .collect();
            assert_eq!(cols, vec![5, 6, 7]);
        }
    }

    #[test]
    fn test_rules_cover_event_area() {
        let cal = layout(2024, 1, 2, LegendMode::Cells);
        assert_eq!(cal.body_range.unwrap().to_string(), "A4:G17");
        let rules = &cal.sheet.conditional_formatting;
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].formula, "UPPER(A4)=UPPER($I$2)");
        assert_eq!(rules[1].formula, "UPPER(A4)=UPPER($I$3)");
        assert_eq!(rules[0].priority, 1);
        assert_eq!(rules[1].priority, 2);
        assert_eq!(rules[1].dxf_id(), Some(1));
        assert!(rules.iter().all(|r| r.sqref == "A4:G17"));
    }

    #[test]
    fn test_cell_legend_rows() {
        let cal = layout(2025, 5, 3, LegendMode::Cells);
        assert_eq!(cal.legend_label_rows, vec![2, 3, 4]);
        assert_eq!(cal.legend_label_ref(2).as_deref(), Some("$I$4"));
        for (slot, row) in (0..3).zip(2..) {
            assert_eq!(
                cal.sheet.cell(LEGEND_LABEL_COL, row).unwrap().value,
                CellValue::from(LEGEND_PLACEHOLDER)
            );
            assert_eq!(
                cal.sheet.cell(LEGEND_SWATCH_COL, row).unwrap().style,
                StyleId::swatch(slot)
            );
        }
    }

    #[test]
    fn test_drawing_mode_keeps_labels_only() {
        let cal = layout(2024, 1, 3, LegendMode::Drawing);
        assert_eq!(cal.legend_label_rows, vec![2, 4, 6]);
        assert!(cal.sheet.cell(LEGEND_LABEL_COL, 1).is_none());
        assert!(cal.sheet.cells().all(|c| c.col != LEGEND_SWATCH_COL));
        assert_eq!(cal.sheet.merges.len(), 1);
        assert_eq!(
            cal.sheet.conditional_formatting[2].formula,
            "UPPER(A4)=UPPER($I$6)"
        );
    }

    #[test]
    fn test_rules_can_be_disabled() {
        let mut spec = CalendarSpec::new(2024, 1, SlotCount::new(4).unwrap(), LegendMode::Cells);
        spec.conditional_formatting = false;
        let cal = layout_calendar(&spec).unwrap();
        assert!(cal.sheet.conditional_formatting.is_empty());
        assert!(cal.body_range.is_some());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = layout(2026, 7, 5, LegendMode::Cells);
        let b = layout(2026, 7, 5, LegendMode::Cells);
        assert_eq!(a.sheet.rows().collect::<Vec<_>>(), b.sheet.rows().collect::<Vec<_>>());
        assert_eq!(a.sheet.conditional_formatting, b.sheet.conditional_formatting);
    }
}
