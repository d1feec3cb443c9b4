use crate::cell_ref::cell_ref;

/// Cell type discriminator as written to the `t` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellType {
    Number,
    #[default]
    InlineStr,
    /// Formula producing a string result
    Str,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Number => "n",
            CellType::InlineStr => "inlineStr",
            CellType::Str => "str",
        }
    }
}

/// Raw value held by a cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

/// A single addressed cell.
///
/// `col` and `row` are 1-based. `style` indexes the workbook's `cellXfs`
/// (0 = default).
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
    pub value: CellValue,
    pub cell_type: CellType,
    pub style: u32,
    /// Number of extra columns this cell should be merged across
    pub merge_across: u32,
    pub formula: Option<String>,
}

impl Cell {
    /// An empty cell of the default (inline string) type.
    pub fn blank(col: u32, row: u32) -> Self {
        Self {
            col,
            row,
            value: CellValue::Empty,
            cell_type: CellType::InlineStr,
            style: 0,
            merge_across: 0,
            formula: None,
        }
    }

    pub fn text(col: u32, row: u32, text: impl Into<String>) -> Self {
        Self {
            value: CellValue::Text(text.into()),
            ..Self::blank(col, row)
        }
    }

    pub fn number(col: u32, row: u32, n: impl Into<f64>) -> Self {
        Self {
            value: CellValue::Number(n.into()),
            cell_type: CellType::Number,
            ..Self::blank(col, row)
        }
    }

    /// A formula cell whose result is a string (`t="str"`).
    pub fn formula(col: u32, row: u32, expr: impl Into<String>) -> Self {
        Self {
            cell_type: CellType::Str,
            formula: Some(expr.into()),
            ..Self::blank(col, row)
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: u32) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = cell_type;
        self
    }

    #[must_use]
    pub fn merge_across(mut self, extra_cols: u32) -> Self {
        self.merge_across = extra_cols;
        self
    }

    /// Address such as `A1`.
    pub fn reference(&self) -> String {
        cell_ref(self.col, self.row)
    }
}
