use std::collections::BTreeMap;

use super::{Cell, ConditionalFormattingRule};
use crate::cell_ref::CellRange;

/// Column width definition covering columns `min..=max` (1-based).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWidth {
    pub min: u32,
    pub max: u32,
    pub width: f64,
}

impl ColumnWidth {
    pub fn new(min: u32, max: u32, width: f64) -> Self {
        Self { min, max, width }
    }

    /// Width definition for a single column.
    pub fn single(col: u32, width: f64) -> Self {
        Self::new(col, col, width)
    }
}

/// One worksheet row.
///
/// Cells are keyed by column, so a row never holds two cells at the same
/// address and always iterates left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub r: u32,
    cells: BTreeMap<u32, Cell>,
}

impl Row {
    pub fn new(r: u32) -> Self {
        Self {
            r,
            cells: BTreeMap::new(),
        }
    }

    /// Insert or replace the cell at the cell's column. Returns the replaced cell.
    ///
    /// The cell's row is rewritten to this row's number.
    pub fn set_cell(&mut self, mut cell: Cell) -> Option<Cell> {
        cell.row = self.r;
        self.cells.insert(cell.col, cell)
    }

    pub fn cell(&self, col: u32) -> Option<&Cell> {
        self.cells.get(&col)
    }

    /// Cells in ascending column order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// In-memory worksheet: sparse rows, column widths, merges and
/// conditional formatting.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    rows: BTreeMap<u32, Row>,
    pub columns: Vec<ColumnWidth>,
    pub merges: Vec<CellRange>,
    pub conditional_formatting: Vec<ConditionalFormattingRule>,
    /// ARGB tab color written to `sheetPr`
    pub tab_color: Option<String>,
    /// Relationship id of the sheet's drawing part
    pub drawing_rel_id: Option<String>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Get the row with this number, creating it if needed.
    pub fn row_mut(&mut self, r: u32) -> &mut Row {
        self.rows.entry(r).or_insert_with(|| Row::new(r))
    }

    /// Insert a whole row, replacing any row with the same number.
    pub fn add_row(&mut self, row: Row) {
        self.rows.insert(row.r, row);
    }

    /// Insert or replace a cell at its address (last write wins).
    pub fn set_cell(&mut self, cell: Cell) -> Option<Cell> {
        self.row_mut(cell.row).set_cell(cell)
    }

    /// Place a cell and register the merge its `merge_across` hint describes.
    pub fn add_merged_cell(&mut self, cell: Cell) {
        if cell.merge_across > 0 {
            self.add_merge(CellRange::across(cell.col, cell.row, cell.merge_across + 1));
        }
        self.set_cell(cell);
    }

    pub fn add_merge(&mut self, range: CellRange) {
        self.merges.push(range);
    }

    pub fn set_columns(&mut self, columns: Vec<ColumnWidth>) {
        self.columns = columns;
    }

    /// Register a rule. Priorities must stay unique within the sheet.
    pub fn add_conditional_formatting(&mut self, rule: ConditionalFormattingRule) {
        debug_assert!(
            self.conditional_formatting
                .iter()
                .all(|existing| existing.priority != rule.priority),
            "duplicate conditional formatting priority {}",
            rule.priority
        );
        self.conditional_formatting.push(rule);
    }

    /// Rules grouped by distinct `sqref`, in first-registration order.
    pub fn conditional_formatting_groups(&self) -> Vec<(&str, Vec<&ConditionalFormattingRule>)> {
        let mut groups: Vec<(&str, Vec<&ConditionalFormattingRule>)> = Vec::new();
        for rule in &self.conditional_formatting {
            match groups.iter_mut().find(|(sqref, _)| *sqref == rule.sqref) {
                Some((_, rules)) => rules.push(rule),
                None => groups.push((rule.sqref.as_str(), vec![rule])),
            }
        }
        groups
    }

    pub fn row(&self, r: u32) -> Option<&Row> {
        self.rows.get(&r)
    }

    /// Rows in ascending row-number order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    pub fn cell(&self, col: u32, row: u32) -> Option<&Cell> {
        self.rows.get(&row).and_then(|r| r.cell(col))
    }

    /// All cells, row by row, left to right.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.values().flat_map(Row::cells)
    }

    /// Highest populated row number, if any.
    pub fn max_row(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }
}
