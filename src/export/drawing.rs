//! Floating legend shapes (`xl/drawings/drawing1.xml`).
//!
//! Used instead of the cell legend when the request asks for a drawing.
//! Every shape is a `oneCellAnchor`: a top-left cell plus an EMU offset,
//! and an explicit EMU extent.

use crate::config::{DrawingOverrides, SlotCount};
use crate::error::Result;
use crate::export::styles::legend_color;
use crate::namespaces::{NS_DRAWING, NS_DRAWING_SPREADSHEET};
use crate::xml::{escape_xml, XML_DECLARATION};

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

const PANEL_FILL: &str = "F3F3F3";
const PANEL_LINE: &str = "BFBFBF";
const HEADER_TEXT: &str = "Legend";

/// Convert inches to EMU, rounding to the nearest unit.
///
/// Negative and non-finite lengths become 0.
#[allow(clippy::cast_possible_truncation)]
pub fn inches_to_emu(inches: f64) -> i64 {
    if !inches.is_finite() {
        return 0;
    }
    (inches.max(0.0) * EMU_PER_INCH).round() as i64
}

/// Inch-based geometry of the legend drawing.
///
/// Columns are 0-based anchor columns (9 = J).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendDrawingLayout {
    pub panel_col: u32,
    pub pill_col: u32,
    /// Horizontal inset from the anchor column's left edge
    pub col_offset_in: f64,
    /// Vertical inset from the anchor row's top edge
    pub row_offset_in: f64,
    pub panel_width_in: f64,
    pub pill_width_in: f64,
    pub pill_height_in: f64,
    /// Height of one sheet row (15pt default)
    pub row_height_in: f64,
}

impl Default for LegendDrawingLayout {
    fn default() -> Self {
        Self {
            panel_col: 9,
            pill_col: 9,
            col_offset_in: 0.05,
            row_offset_in: 0.02,
            panel_width_in: 0.9,
            pill_width_in: 0.8,
            pill_height_in: 0.17,
            row_height_in: 15.0 / 72.0,
        }
    }
}

impl LegendDrawingLayout {
    /// Defaults with any caller overrides applied.
    pub fn with_overrides(overrides: Option<&DrawingOverrides>) -> Self {
        let mut layout = Self::default();
        let Some(o) = overrides else {
            return layout;
        };
        if let Some(v) = o.panel_col {
            layout.panel_col = v;
        }
        if let Some(v) = o.pill_col {
            layout.pill_col = v;
        }
        if let Some(v) = o.col_offset_in {
            layout.col_offset_in = v;
        }
        if let Some(v) = o.row_offset_in {
            layout.row_offset_in = v;
        }
        if let Some(v) = o.panel_width_in {
            layout.panel_width_in = v;
        }
        if let Some(v) = o.pill_width_in {
            layout.pill_width_in = v;
        }
        if let Some(v) = o.pill_height_in {
            layout.pill_height_in = v;
        }
        if let Some(v) = o.row_height_in {
            layout.row_height_in = v;
        }
        layout
    }
}

/// Top-left anchor of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub col: u32,
    pub col_off: i64,
    /// 0-based row
    pub row: u32,
    pub row_off: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Panel,
    Header,
    Pill,
}

/// One positioned legend shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendShape {
    pub id: u32,
    pub name: String,
    pub kind: ShapeKind,
    pub anchor: Anchor,
    pub cx: i64,
    pub cy: i64,
    /// RGB fill, no alpha
    pub fill: String,
}

/// Drop the alpha byte of an ARGB color.
fn rgb(argb: &str) -> &str {
    if argb.len() == 8 {
        argb.get(2..).unwrap_or(argb)
    } else {
        argb
    }
}

/// Compute the legend shapes: panel, header, then one pill per slot.
///
/// The row cursor starts under the header and moves two rows per pill
/// (pill row plus spacer), so pill `k` sits on 0-based row `1 + 2k`.
pub fn legend_shapes(slots: SlotCount, layout: &LegendDrawingLayout) -> Result<Vec<LegendShape>> {
    let col_off = inches_to_emu(layout.col_offset_in);
    let row_off = inches_to_emu(layout.row_offset_in);
    let row_height = inches_to_emu(layout.row_height_in);
    let spanned_rows = i64::from(1 + 2 * slots.get());

    let mut shapes = Vec::with_capacity(slots.slots().len() + 2);
    let mut next_id = 2;

    shapes.push(LegendShape {
        id: next_id,
        name: "Legend Panel".to_string(),
        kind: ShapeKind::Panel,
        anchor: Anchor {
            col: layout.panel_col,
            col_off,
            row: 0,
            row_off,
        },
        cx: inches_to_emu(layout.panel_width_in),
        cy: (row_height * spanned_rows - 2 * row_off).max(0),
        fill: PANEL_FILL.to_string(),
    });
    next_id += 1;

    shapes.push(LegendShape {
        id: next_id,
        name: "Legend Header".to_string(),
        kind: ShapeKind::Header,
        anchor: Anchor {
            col: layout.panel_col,
            col_off,
            row: 0,
            row_off,
        },
        cx: inches_to_emu(layout.panel_width_in),
        cy: (row_height - 2 * row_off).max(0),
        fill: PANEL_FILL.to_string(),
    });
    next_id += 1;

    let mut row_cursor = 1;
    for slot in slots.slots() {
        shapes.push(LegendShape {
            id: next_id,
            name: format!("Legend Pill {}", slot + 1),
            kind: ShapeKind::Pill,
            anchor: Anchor {
                col: layout.pill_col,
                col_off,
                row: row_cursor,
                row_off,
            },
            cx: inches_to_emu(layout.pill_width_in),
            cy: inches_to_emu(layout.pill_height_in),
            fill: rgb(legend_color(slot)?).to_string(),
        });
        next_id += 1;
        row_cursor += 2;
    }

    Ok(shapes)
}

/// Serialize shapes to a `xdr:wsDr` drawing part.
pub fn write_legend_drawing(shapes: &[LegendShape]) -> String {
    let mut xml = String::with_capacity(1024 + shapes.len() * 768);
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<xdr:wsDr xmlns:xdr="{NS_DRAWING_SPREADSHEET}" xmlns:a="{NS_DRAWING}">"#
    ));
    xml.push('\n');

    for shape in shapes {
        let a = &shape.anchor;
        xml.push_str("<xdr:oneCellAnchor>");
        xml.push_str(&format!(
            "<xdr:from><xdr:col>{}</xdr:col><xdr:colOff>{}</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>{}</xdr:rowOff></xdr:from>",
            a.col, a.col_off, a.row, a.row_off
        ));
        xml.push_str(&format!(r#"<xdr:ext cx="{}" cy="{}"/>"#, shape.cx, shape.cy));

        xml.push_str(r#"<xdr:sp macro="" textlink="">"#);
        xml.push_str(&format!(
            r#"<xdr:nvSpPr><xdr:cNvPr id="{}" name="{}"/><xdr:cNvSpPr/></xdr:nvSpPr>"#,
            shape.id,
            escape_xml(&shape.name)
        ));

        let geometry = match shape.kind {
            ShapeKind::Pill => "roundRect",
            ShapeKind::Panel | ShapeKind::Header => "rect",
        };
        xml.push_str("<xdr:spPr>");
        xml.push_str(&format!(
            r#"<a:prstGeom prst="{geometry}"><a:avLst/></a:prstGeom>"#
        ));
        xml.push_str(&format!(
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            escape_xml(&shape.fill)
        ));
        match shape.kind {
            ShapeKind::Panel => xml.push_str(&format!(
                r#"<a:ln w="9525"><a:solidFill><a:srgbClr val="{PANEL_LINE}"/></a:solidFill></a:ln>"#
            )),
            ShapeKind::Header | ShapeKind::Pill => xml.push_str("<a:ln><a:noFill/></a:ln>"),
        }
        xml.push_str("</xdr:spPr>");

        if shape.kind == ShapeKind::Header {
            xml.push_str(r#"<xdr:txBody><a:bodyPr vertOverflow="clip" wrap="square" anchor="ctr"/><a:lstStyle/>"#);
            xml.push_str(r#"<a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="en-US" sz="1200" b="1"/>"#);
            xml.push_str(&format!("<a:t>{}</a:t>", escape_xml(HEADER_TEXT)));
            xml.push_str("</a:r></a:p></xdr:txBody>");
        }

        xml.push_str("</xdr:sp>");
        xml.push_str("<xdr:clientData/>");
        xml.push_str("</xdr:oneCellAnchor>\n");
    }

    xml.push_str("</xdr:wsDr>");
    xml
}

/// Build the legend drawing part for `slots` entries.
pub fn build_legend_drawing(
    slots: SlotCount,
    overrides: Option<&DrawingOverrides>,
) -> Result<Vec<u8>> {
    let layout = LegendDrawingLayout::with_overrides(overrides);
    let shapes = legend_shapes(slots, &layout)?;
    log::debug!(
        "legend drawing: {} shapes anchored at column {}",
        shapes.len(),
        layout.panel_col
    );
    Ok(write_legend_drawing(&shapes).into_bytes())
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
    fn test_inches_to_emu() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(0.5), 457_200);
        assert_eq!(inches_to_emu(15.0 / 72.0), 190_500);
        assert_eq!(inches_to_emu(-2.0), 0);
        assert_eq!(inches_to_emu(f64::NAN), 0);
    }

    #[test]
    fn test_pill_rows_alternate_with_spacers() {
        let shapes =
            legend_shapes(SlotCount::new(3).unwrap(), &LegendDrawingLayout::default()).unwrap();
        assert_eq!(shapes.len(), 5);
        let pill_rows: Vec<u32> = shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::Pill)
            .map(|s| s.anchor.row)
            .collect();
        assert_eq!(pill_rows, vec![1, 3, 5]);
        let ids: Vec<u32> = shapes.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6]);
        assert_eq!(shapes[2].fill, "DC143C");
    }

    #[test]
    fn test_overrides_move_pills() {
        let overrides = DrawingOverrides {
            pill_col: Some(11),
            col_offset_in: Some(0.25),
            ..DrawingOverrides::default()
        };
        let layout = LegendDrawingLayout::with_overrides(Some(&overrides));
        let shapes = legend_shapes(SlotCount::new(1).unwrap(), &layout).unwrap();
        let pill = shapes.iter().find(|s| s.kind == ShapeKind::Pill).unwrap();
        assert_eq!(pill.anchor.col, 11);
        assert_eq!(pill.anchor.col_off, 228_600);
        // Panel keeps its default column
        assert_eq!(shapes[0].anchor.col, 9);
    }

    #[test]
    fn test_panel_spans_all_pill_rows() {
        let layout = LegendDrawingLayout::default();
        let shapes = legend_shapes(SlotCount::new(2).unwrap(), &layout).unwrap();
        let row = inches_to_emu(layout.row_height_in);
        let off = inches_to_emu(layout.row_offset_in);
        assert_eq!(shapes[0].cy, row * 5 - 2 * off);
    }

    #[test]
    fn test_drawing_xml() {
        let xml = String::from_utf8(build_legend_drawing(SlotCount::new(2).unwrap(), None).unwrap())
            .unwrap();
        assert_eq!(xml.matches("<xdr:oneCellAnchor>").count(), 4);
        assert_eq!(xml.matches(r#"prst="roundRect""#).count(), 2);
        assert!(xml.contains("<a:t>Legend</a:t>"));
        assert!(xml.contains(r#"<a:srgbClr val="228B22"/>"#));
        assert!(xml.contains("<xdr:row>3</xdr:row>"));
    }
}
