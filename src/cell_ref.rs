//! Utilities for building Excel-style cell references and ranges.
//!
//! Columns and rows are 1-based throughout the generator, matching the `r`
//! attributes written into worksheet XML.

use std::fmt;

/// Convert a 1-based column index to its letter name (1 -> "A", 27 -> "AA").
///
/// Column 0 is treated as column 1.
pub fn col_to_letter(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col.max(1);
    while n > 0 {
        n -= 1;
        let offset = u8::try_from(n % 26).unwrap_or(0);
        letters.push(char::from(b'A' + offset));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Format a single cell address such as `D3`.
pub fn cell_ref(col: u32, row: u32) -> String {
    format!("{}{}", col_to_letter(col), row)
}

/// Format an absolute address such as `$I$2`.
pub fn absolute_ref(col: u32, row: u32) -> String {
    format!("${}${}", col_to_letter(col), row)
}

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub first_col: u32,
    pub first_row: u32,
    pub last_col: u32,
    pub last_row: u32,
}

impl CellRange {
    pub fn new(first_col: u32, first_row: u32, last_col: u32, last_row: u32) -> Self {
        Self {
            first_col,
            first_row,
            last_col,
            last_row,
        }
    }

    /// A range spanning `cols` columns of a single row, starting at `col`.
    pub fn across(col: u32, row: u32, cols: u32) -> Self {
        Self::new(col, row, col + cols.saturating_sub(1), row)
    }

    /// Top-left address of the range.
    pub fn top_left(&self) -> String {
        cell_ref(self.first_col, self.first_row)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            cell_ref(self.first_col, self.first_row),
            cell_ref(self.last_col, self.last_row)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(1), "A");
        assert_eq!(col_to_letter(7), "G");
        assert_eq!(col_to_letter(26), "Z");
        assert_eq!(col_to_letter(27), "AA");
        assert_eq!(col_to_letter(703), "AAA");
    }

    #[test]
    fn test_range_display() {
        let range = CellRange::new(1, 4, 7, 21);
        assert_eq!(range.to_string(), "A4:G21");
        assert_eq!(range.top_left(), "A4");
    }

    #[test]
    fn test_across_and_absolute() {
        let title = CellRange::across(1, 1, 7);
        assert_eq!(title.to_string(), "A1:G1");
        assert_eq!(CellRange::across(9, 1, 2).to_string(), "I1:J1");
        assert_eq!(absolute_ref(9, 3), "$I$3");
    }
}
