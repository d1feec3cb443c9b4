/// How a conditional formatting rule decides whether a cell matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfRuleKind {
    /// `type="expression"`: the formula is evaluated relative to each cell
    Expression,
    /// `type="cellIs" operator="equal"`: cell value equals the formula result
    CellEquals,
}

/// The highlight applied when a rule matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfFormat {
    /// Index into the stylesheet's `dxfs` list
    Dxf(u32),
    /// Inline solid fill, ARGB
    Fill(String),
}

/// One highlight rule bound to a cell range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalFormattingRule {
    pub sqref: String,
    pub formula: String,
    /// Evaluation order; lower values take precedence
    pub priority: u32,
    pub kind: CfRuleKind,
    pub format: CfFormat,
}

impl ConditionalFormattingRule {
    pub fn new(
        sqref: impl Into<String>,
        formula: impl Into<String>,
        priority: u32,
        kind: CfRuleKind,
        format: CfFormat,
    ) -> Self {
        Self {
            sqref: sqref.into(),
            formula: formula.into(),
            priority,
            kind,
            format,
        }
    }

    /// Expression rule highlighting with a stylesheet DXF.
    pub fn expression(
        sqref: impl Into<String>,
        formula: impl Into<String>,
        priority: u32,
        dxf_id: u32,
    ) -> Self {
        Self::new(
            sqref,
            formula,
            priority,
            CfRuleKind::Expression,
            CfFormat::Dxf(dxf_id),
        )
    }

    pub fn dxf_id(&self) -> Option<u32> {
        match self.format {
            CfFormat::Dxf(id) => Some(id),
            CfFormat::Fill(_) => None,
        }
    }
}
