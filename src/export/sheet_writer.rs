//! Generates worksheet XML from a `Sheet` struct.
//!
//! Text cells are written as inline strings (`t="inlineStr"`), so the
//! package never needs a shared string table.

use crate::namespaces::{NS_OFFICE_RELATIONSHIPS, NS_SPREADSHEET};
use crate::types::{
    Cell, CellType, CellValue, CfFormat, CfRuleKind, ConditionalFormattingRule, Row, Sheet,
};
use crate::xml::{escape_display, escape_xml, XML_DECLARATION};

/// Write a complete worksheet XML string from a `Sheet`.
pub fn write_sheet_xml(sheet: &Sheet) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    out.push_str(&format!(
        r#"<worksheet xmlns="{NS_SPREADSHEET}" xmlns:r="{NS_OFFICE_RELATIONSHIPS}">"#
    ));
    out.push('\n');

    // <sheetPr>: tab color
    if let Some(ref color) = sheet.tab_color {
        out.push_str(&format!(
            "<sheetPr><tabColor rgb=\"{}\"/></sheetPr>\n",
            escape_xml(color)
        ));
    }

    // <cols>
    if !sheet.columns.is_empty() {
        out.push_str("<cols>");
        for cw in &sheet.columns {
            out.push_str(&format!(
                "<col min=\"{}\" max=\"{}\" width=\"{}\" customWidth=\"1\"/>",
                cw.min, cw.max, cw.width
            ));
        }
        out.push_str("</cols>\n");
    }

    // <sheetData>
    out.push_str("<sheetData>\n");
    for row in sheet.rows() {
        write_row(&mut out, row);
    }
    out.push_str("</sheetData>\n");

    // <mergeCells>
    if !sheet.merges.is_empty() {
        out.push_str(&format!("<mergeCells count=\"{}\">", sheet.merges.len()));
        for merge in &sheet.merges {
            out.push_str(&format!("<mergeCell ref=\"{merge}\"/>"));
        }
        out.push_str("</mergeCells>\n");
    }

    // <conditionalFormatting>: one block per distinct range
    for (sqref, rules) in sheet.conditional_formatting_groups() {
        out.push_str(&format!(
            "<conditionalFormatting sqref=\"{}\">",
            escape_xml(sqref)
        ));
        for rule in rules {
            write_cf_rule(&mut out, rule);
        }
        out.push_str("</conditionalFormatting>\n");
    }

    // <drawing>
    if let Some(ref rel_id) = sheet.drawing_rel_id {
        out.push_str(&format!("<drawing r:id=\"{}\"/>\n", escape_xml(rel_id)));
    }

    out.push_str("</worksheet>");
    out
}

/// Write one `<row>` with its cells in column order.
fn write_row(out: &mut String, row: &Row) {
    if row.is_empty() {
        return;
    }
    out.push_str(&format!("<row r=\"{}\">", row.r));
    for cell in row.cells() {
        write_cell(out, cell);
    }
    out.push_str("</row>\n");
}

/// Write a single `<c>` element.
fn write_cell(out: &mut String, cell: &Cell) {
    out.push_str(&format!("<c r=\"{}\"", cell.reference()));

    if cell.style != 0 {
        out.push_str(&format!(" s=\"{}\"", cell.style));
    }

    if let Some(ref f) = cell.formula {
        out.push_str(&format!(" t=\"{}\">", cell.cell_type.as_str()));
        out.push_str("<f>");
        out.push_str(&escape_xml(f));
        out.push_str("</f></c>");
        return;
    }

    let text = match &cell.value {
        CellValue::Number(n) => escape_display(n),
        CellValue::Text(t) if !t.is_empty() => escape_xml(t).into_owned(),
        // Empty: the default type is implied, anything else stays explicit
        _ => {
            if cell.cell_type != CellType::default() {
                out.push_str(&format!(" t=\"{}\"", cell.cell_type.as_str()));
            }
            out.push_str("></c>");
            return;
        }
    };

    // The declared type decides the value node, not the value's variant
    match cell.cell_type {
        CellType::Number => {
            out.push_str(" t=\"n\"><v>");
            out.push_str(&text);
            out.push_str("</v>");
        }
        CellType::InlineStr | CellType::Str => {
            out.push_str(" t=\"inlineStr\"><is><t>");
            out.push_str(&text);
            out.push_str("</t></is>");
        }
    }

    out.push_str("</c>");
}

/// Write a single `<cfRule>` element.
fn write_cf_rule(out: &mut String, rule: &ConditionalFormattingRule) {
    match rule.kind {
        CfRuleKind::Expression => out.push_str("<cfRule type=\"expression\""),
        CfRuleKind::CellEquals => out.push_str("<cfRule type=\"cellIs\" operator=\"equal\""),
    }
    if let CfFormat::Dxf(id) = rule.format {
        out.push_str(&format!(" dxfId=\"{id}\""));
    }
    out.push_str(&format!(" priority=\"{}\">", rule.priority));
    out.push_str("<formula>");
    out.push_str(&escape_xml(&rule.formula));
    out.push_str("</formula>");
    if let CfFormat::Fill(ref color) = rule.format {
        out.push_str(&format!(
            "<dxf><fill><patternFill patternType=\"solid\"><fgColor rgb=\"{}\"/></patternFill></fill></dxf>",
            escape_xml(color)
        ));
    }
    out.push_str("</cfRule>");
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
    use crate::cell_ref::CellRange;

    #[test]
    fn test_cells_serialize_in_column_order() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(Cell::text(3, 1, "c"));
        sheet.set_cell(Cell::text(1, 1, "a"));
        sheet.set_cell(Cell::number(2, 1, 5));
        let xml = write_sheet_xml(&sheet);
        let a = xml.find("r=\"A1\"").unwrap();
        let b = xml.find("r=\"B1\"").unwrap();
        let c = xml.find("r=\"C1\"").unwrap();
        assert!(a < b && b < c);
        assert!(xml.contains(r#"<c r="B1" t="n"><v>5</v></c>"#));
    }

    #[test]
    fn test_empty_default_cell_keeps_only_style() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(Cell::blank(10, 2).with_style(8));
        sheet.set_cell(Cell::blank(1, 3));
        sheet.set_cell(Cell::blank(2, 3).with_type(CellType::Number));
        let xml = write_sheet_xml(&sheet);
        assert!(xml.contains(r#"<c r="J2" s="8"></c>"#));
        assert!(xml.contains(r#"<c r="A3"></c>"#));
        assert!(xml.contains(r#"<c r="B3" t="n"></c>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(Cell::text(1, 1, "Tom & \"Jerry\" <3"));
        let xml = write_sheet_xml(&sheet);
        assert!(xml.contains(
            r#"<c r="A1" t="inlineStr"><is><t>Tom &amp; &quot;Jerry&quot; &lt;3</t></is></c>"#
        ));
    }

    #[test]
    fn test_formula_cell() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(Cell::formula(2, 2, "COUNTIF(Calendar!A:G,Calendar!I2)"));
        let xml = write_sheet_xml(&sheet);
        assert!(xml.contains(
            r#"<c r="B2" t="str"><f>COUNTIF(Calendar!A:G,Calendar!I2)</f></c>"#
        ));
    }

    #[test]
    fn test_block_order_and_merge_count() {
        let mut sheet = Sheet::new("S");
        sheet.tab_color = Some("FF00B050".to_string());
        sheet.set_columns(vec![crate::types::ColumnWidth::new(1, 7, 13.0)]);
        sheet.set_cell(Cell::text(1, 1, "x"));
        sheet.add_merge(CellRange::new(1, 1, 7, 1));
        sheet.add_merge(CellRange::new(9, 1, 10, 1));
        sheet.add_conditional_formatting(ConditionalFormattingRule::expression(
            "A4:G17", "A4=1", 1, 0,
        ));
        sheet.drawing_rel_id = Some("rId1".to_string());
        let xml = write_sheet_xml(&sheet);

        let order = [
            "<sheetPr>",
            "<cols>",
            "<sheetData>",
            "<mergeCells count=\"2\">",
            "<conditionalFormatting",
            "<drawing r:id=\"rId1\"/>",
        ];
        let positions: Vec<usize> = order.iter().map(|tag| xml.find(tag).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rules_grouped_by_range() {
        let mut sheet = Sheet::new("S");
        sheet.add_conditional_formatting(ConditionalFormattingRule::expression("A1:B2", "A1=1", 1, 0));
        sheet.add_conditional_formatting(ConditionalFormattingRule::expression("C1:C5", "C1=1", 2, 1));
        sheet.add_conditional_formatting(ConditionalFormattingRule::expression("A1:B2", "A1=2", 3, 2));
        let xml = write_sheet_xml(&sheet);
        assert_eq!(xml.matches("<conditionalFormatting ").count(), 2);
        assert_eq!(xml.matches("<cfRule ").count(), 3);
        assert!(xml.contains(
            r#"<conditionalFormatting sqref="A1:B2"><cfRule type="expression" dxfId="0" priority="1"><formula>A1=1</formula></cfRule><cfRule type="expression" dxfId="2" priority="3">"#
        ));
    }

    #[test]
    fn test_declared_type_decides_value_node() {
        let mut sheet = Sheet::new("S");
        sheet.set_cell(Cell::number(1, 1, 5).with_type(CellType::InlineStr));
        sheet.set_cell(Cell::number(2, 1, 2.5));
        sheet.set_cell(Cell::text(3, 1, "12").with_type(CellType::Number));
        let xml = write_sheet_xml(&sheet);
        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><t>5</t></is></c>"#));
        assert!(xml.contains(r#"<c r="B1" t="n"><v>2.5</v></c>"#));
        assert!(xml.contains(r#"<c r="C1" t="n"><v>12</v></c>"#));
    }

    #[test]
    fn test_cell_equals_rule_with_inline_fill() {
        let mut sheet = Sheet::new("S");
        sheet.add_conditional_formatting(ConditionalFormattingRule::new(
            "B2:B9",
            "5",
            1,
            CfRuleKind::CellEquals,
            CfFormat::Fill("FFFF0000".to_string()),
        ));
        let xml = write_sheet_xml(&sheet);
        assert!(xml.contains(
            r#"<conditionalFormatting sqref="B2:B9"><cfRule type="cellIs" operator="equal" priority="1"><formula>5</formula><dxf><fill><patternFill patternType="solid"><fgColor rgb="FFFF0000"/></patternFill></fill></dxf></cfRule></conditionalFormatting>"#
        ));
        assert!(!xml.contains("dxfId"));
    }

    #[test]
    fn test_no_optional_blocks_when_empty() {
        let xml = write_sheet_xml(&Sheet::new("S"));
        assert!(!xml.contains("<cols>"));
        assert!(!xml.contains("<mergeCells"));
        assert!(!xml.contains("<conditionalFormatting"));
        assert!(!xml.contains("<drawing"));
        assert!(xml.contains("<sheetData>\n</sheetData>"));
    }
}
