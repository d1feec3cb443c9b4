//! Tests for the calendar worksheet read back from a generated workbook.
//!
//! The calendar sheet is `xl/worksheets/sheet2.xml`. Row plan:
//! - row 1: merged month title, merged legend title
//! - row 2: SUNDAY..SATURDAY
//! - row 3+: week rows of day numbers, each followed by the event rows
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use common::{elements, read_cells, read_parts, split_ref};
use test_case::test_case;
use xlcal::{build_calendar_sheet, build_document, CalendarRequest, LegendMode, SlotCount};

const CALENDAR_PART: &str = "xl/worksheets/sheet2.xml";

fn calendar_xml(year: i32, month: u32, slots: u32) -> String {
    let bytes = build_document(&CalendarRequest::new(year, month, slots)).unwrap();
    let parts = read_parts(&bytes);
    parts[CALENDAR_PART].clone()
}

// =============================================================================
// February 2024 scenario
// =============================================================================

#[test]
fn test_february_2024_header() {
    let xml = calendar_xml(2024, 1, 2);
    let cells = read_cells(&xml);

    assert_eq!(cells.value("A1"), Some("FEBRUARY 2024"));
    let merges: Vec<String> = elements(&xml, "mergeCell")
        .into_iter()
        .map(|m| m["ref"].clone())
        .collect();
    assert!(merges.contains(&"A1:G1".to_string()));
    assert!(merges.contains(&"I1:J1".to_string()));
    assert_eq!(cells.value("I1"), Some("Legend"));

    let weekdays: Vec<&str> = ["A2", "B2", "C2", "D2", "E2", "F2", "G2"]
        .iter()
        .map(|r| cells.value(r).unwrap())
        .collect();
    assert_eq!(
        weekdays,
        ["SUNDAY", "MONDAY", "TUESDAY", "WEDNESDAY", "THURSDAY", "FRIDAY", "SATURDAY"]
    );
}

#[test]
fn test_february_2024_starts_on_thursday() {
    let cells = read_cells(&calendar_xml(2024, 1, 2));

    // Weekday offset 4: A3..D3 are empty, day 1 lands in E3
    for blank in ["A3", "B3", "C3", "D3"] {
        assert!(cells.get(blank).is_none(), "{blank} should not exist");
    }
    let first = cells.get("E3").unwrap();
    assert_eq!(first.value.as_deref(), Some("1"));
    assert_eq!(first.cell_type.as_deref(), Some("n"));
    assert_eq!(cells.value("F3"), Some("2"));
    assert_eq!(cells.value("G3"), Some("3"));
    // Second week starts on Sunday after the two event rows
    assert_eq!(cells.value("A6"), Some("4"));
}

#[test]
fn test_february_2024_rules() {
    let xml = calendar_xml(2024, 1, 2);
    let blocks = elements(&xml, "conditionalFormatting");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["sqref"], "A4:G17");

    let rules = elements(&xml, "cfRule");
    let priorities: Vec<&str> = rules.iter().map(|r| r["priority"].as_str()).collect();
    assert_eq!(priorities, ["1", "2"]);
    let dxfs: Vec<&str> = rules.iter().map(|r| r["dxfId"].as_str()).collect();
    assert_eq!(dxfs, ["0", "1"]);
    assert!(rules.iter().all(|r| r["type"] == "expression"));

    let formulas = common::element_texts(&xml, "formula");
    assert_eq!(formulas, ["UPPER(A4)=UPPER($I$2)", "UPPER(A4)=UPPER($I$3)"]);
}

// =============================================================================
// Grid properties across months
// =============================================================================

#[test_case(2024, 0, 31 ; "january 2024")]
#[test_case(2024, 1, 29 ; "leap february")]
#[test_case(2023, 1, 28 ; "common february")]
#[test_case(2024, 8, 30 ; "september 2024")]
#[test_case(2026, 7, 31 ; "august 2026 starts saturday")]
#[test_case(2025, 5, 30 ; "june 2025 starts sunday")]
fn test_every_day_appears_once(year: i32, month: u32, days: u32) {
    let cells = read_cells(&calendar_xml(year, month, 3));
    let mut found: Vec<u32> = cells
        .cells
        .iter()
        .filter(|(r, c)| {
            let (col, row) = split_ref(r);
            row >= 3 && col <= 7 && c.cell_type.as_deref() == Some("n")
        })
        .map(|(_, c)| c.value.as_deref().unwrap().parse().unwrap())
        .collect();
    found.sort_unstable();
    assert_eq!(found, (1..=days).collect::<Vec<_>>());
}

#[test_case(1 ; "one slot")]
#[test_case(4 ; "four slots")]
#[test_case(9 ; "nine slots")]
fn test_event_rows_only_under_real_days(slots: u32) {
    let cells = read_cells(&calendar_xml(2024, 1, slots));
    let week_rows: Vec<u32> = (0..5).map(|w| 3 + w * (slots + 1)).collect();

    for &week_row in &week_rows {
        let day_cols: Vec<u32> = (1..=7)
            .filter(|&col| {
                let reference = format!("{}{week_row}", char::from(b'A' + u8::try_from(col - 1).unwrap()));
                cells.get(&reference).is_some()
            })
            .collect();
        for event_row in week_row + 1..=week_row + slots {
            let event_cols: Vec<u32> = cells
                .cells
                .keys()
                .map(|r| split_ref(r))
                .filter(|&(col, row)| row == event_row && col <= 7)
                .map(|(col, _)| col)
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
            assert_eq!(event_cols, day_cols, "event row {event_row}");
        }
    }

    // Nothing below the last week's event rows
    let last = week_rows[4] + slots;
    assert_eq!(cells.rows.last().copied(), Some(last));
}

#[test]
fn test_rows_and_cells_serialize_in_order() {
    let cells = read_cells(&calendar_xml(2025, 11, 5));
    assert!(cells.rows.windows(2).all(|w| w[0] < w[1]));
    for row in &cells.row_cells {
        let cols: Vec<u32> = row.iter().map(|r| split_ref(r).0).collect();
        assert!(cols.windows(2).all(|w| w[0] < w[1]), "{row:?}");
    }
}

#[test_case(1)]
#[test_case(2)]
#[test_case(3)]
#[test_case(5)]
#[test_case(7)]
#[test_case(9)]
fn test_one_rule_per_slot(slots: u32) {
    let xml = calendar_xml(2024, 1, slots);
    let rules = elements(&xml, "cfRule");
    assert_eq!(rules.len(), usize::try_from(slots).unwrap());
    let priorities: Vec<u32> = rules.iter().map(|r| r["priority"].parse().unwrap()).collect();
    assert_eq!(priorities, (1..=slots).collect::<Vec<_>>());
    assert_eq!(elements(&xml, "conditionalFormatting").len(), 1);
}

#[test]
fn test_cell_legend_rows() {
    let cells = read_cells(&calendar_xml(2024, 1, 3));
    for (slot, row) in (0..3u32).zip(2..) {
        assert_eq!(cells.value(&format!("I{row}")), Some("Enter Value Here"));
        let swatch = cells.get(&format!("J{row}")).unwrap();
        assert_eq!(swatch.style, 7 + slot);
        assert!(swatch.value.is_none());
        assert!(swatch.cell_type.is_none());
    }
}

#[test]
fn test_no_conditional_formatting_when_disabled() {
    let mut request = CalendarRequest::new(2024, 1, 3);
    request.include_conditional_formatting = false;
    let parts = read_parts(&build_document(&request).unwrap());
    assert!(elements(&parts[CALENDAR_PART], "conditionalFormatting").is_empty());
}

#[test]
fn test_sheet_generation_is_deterministic() {
    let slots = SlotCount::new(6).unwrap();
    let a = build_calendar_sheet(2030, 4, slots, LegendMode::Cells).unwrap();
    let b = build_calendar_sheet(2030, 4, slots, LegendMode::Cells).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_tab_color_on_calendar_sheet() {
    let xml = calendar_xml(2024, 1, 1);
    let tabs = elements(&xml, "tabColor");
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0]["rgb"], "FF00B050");
}
