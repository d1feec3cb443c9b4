//! Shared stylesheet (`xl/styles.xml`) for the calendar workbook.
//!
//! Indices are positional and fixed for a given slot count: the layout
//! engine writes [`StyleId`] values into cells and [`dxf_index`] values into
//! conditional formatting rules, and this table must put the matching
//! records at exactly those positions.

use crate::config::SlotCount;
use crate::error::{Result, XlcalError};
use crate::namespaces::NS_SPREADSHEET;
use crate::xml::{escape_xml, XML_DECLARATION};

/// Legend colors (ARGB), one per slot.
pub const LEGEND_PALETTE: [&str; 9] = [
    "FFDC143C", // crimson
    "FF228B22", // forest green
    "FF1E90FF", // dodger blue
    "FFFFA500", // orange
    "FF800080", // purple
    "FFFFFF00", // yellow
    "FF00CED1", // dark turquoise
    "FF8B4513", // saddle brown
    "FF4682B4", // steel blue
];

/// Palette color for a slot.
pub fn legend_color(slot: u32) -> Result<&'static str> {
    usize::try_from(slot)
        .ok()
        .and_then(|i| LEGEND_PALETTE.get(i))
        .copied()
        .ok_or(XlcalError::InvalidSlotCount(slot + 1))
}

/// `cellXfs` indices used by the sheet builders.
#[derive(Debug, Clone, Copy)]
pub struct StyleId;

impl StyleId {
    pub const NORMAL: u32 = 0;
    pub const BOLD: u32 = 1;
    pub const BOLD_BORDER: u32 = 2;
    pub const BORDER: u32 = 3;
    /// Large bold title on the header tint, centered
    pub const TITLE: u32 = 4;
    /// Wrapped note text on light yellow
    pub const NOTE: u32 = 5;
    pub const LEGEND_HEADER: u32 = 6;
    const FIRST_SWATCH: u32 = 7;

    /// Bordered solid fill in the slot's palette color.
    pub fn swatch(slot: u32) -> u32 {
        Self::FIRST_SWATCH + slot
    }
}

/// `dxfs` index of a slot's highlight.
pub fn dxf_index(slot: u32) -> u32 {
    slot
}

const FONT_NORMAL: u32 = 0;
const FONT_BOLD: u32 = 1;
const FONT_TITLE: u32 = 2;
const FONT_LEGEND_HEADER: u32 = 3;
const FONT_NOTE: u32 = 4;

const FILL_NONE: u32 = 0;
const FILL_HEADER: u32 = 2;
const FILL_LEGEND_HEADER: u32 = 3;
const FILL_NOTE: u32 = 4;
const FIRST_PALETTE_FILL: u32 = 5;

const BORDER_NONE: u32 = 0;
const BORDER_BOX: u32 = 1;
const BORDER_BOTTOM: u32 = 2;

#[derive(Debug, Clone, PartialEq)]
struct FontDef {
    size: f64,
    bold: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum FillDef {
    None,
    Gray125,
    Solid(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BorderDef {
    None,
    ThinBox,
    ThinBottom,
}

#[derive(Debug, Clone, PartialEq)]
struct AlignmentDef {
    horizontal: &'static str,
    vertical: &'static str,
    wrap_text: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct CellXfDef {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    alignment: Option<AlignmentDef>,
}

impl CellXfDef {
    fn plain(font_id: u32, fill_id: u32, border_id: u32) -> Self {
        Self {
            font_id,
            fill_id,
            border_id,
            alignment: None,
        }
    }

    fn centered(font_id: u32, fill_id: u32, border_id: u32, wrap_text: bool) -> Self {
        Self {
            alignment: Some(AlignmentDef {
                horizontal: "center",
                vertical: "center",
                wrap_text,
            }),
            ..Self::plain(font_id, fill_id, border_id)
        }
    }
}

/// Differential format: solid background only.
#[derive(Debug, Clone, PartialEq)]
struct DxfDef {
    bg_color: &'static str,
}

/// The five parallel style lists for one generated workbook.
#[derive(Debug, Clone)]
pub struct StyleTable {
    fonts: Vec<FontDef>,
    fills: Vec<FillDef>,
    borders: Vec<BorderDef>,
    cell_xfs: Vec<CellXfDef>,
    dxfs: Vec<DxfDef>,
}

impl StyleTable {
    /// Build the table for `slots` legend entries.
    pub fn for_slots(slots: SlotCount) -> Result<Self> {
        let fonts = vec![
            FontDef {
                size: 11.0,
                bold: false,
            },
            FontDef {
                size: 11.0,
                bold: true,
            },
            FontDef {
                size: 16.0,
                bold: true,
            },
            FontDef {
                size: 12.0,
                bold: true,
            },
            FontDef {
                size: 13.0,
                bold: false,
            },
        ];

        let mut fills = vec![
            FillDef::None,
            FillDef::Gray125,
            FillDef::Solid("FFB6D7A8"),
            FillDef::Solid("FFD9EAD3"),
            FillDef::Solid("FFFFFF9C"),
        ];

        let borders = vec![BorderDef::None, BorderDef::ThinBox, BorderDef::ThinBottom];

        let mut cell_xfs = vec![
            CellXfDef::plain(FONT_NORMAL, FILL_NONE, BORDER_NONE),
            CellXfDef::plain(FONT_BOLD, FILL_NONE, BORDER_NONE),
            CellXfDef::plain(FONT_BOLD, FILL_NONE, BORDER_BOX),
            CellXfDef::plain(FONT_NORMAL, FILL_NONE, BORDER_BOX),
            CellXfDef::centered(FONT_TITLE, FILL_HEADER, BORDER_BOTTOM, false),
            CellXfDef::centered(FONT_NOTE, FILL_NOTE, BORDER_BOX, true),
            CellXfDef::centered(FONT_LEGEND_HEADER, FILL_LEGEND_HEADER, BORDER_BOX, false),
        ];

        let mut dxfs = Vec::new();

        for slot in slots.slots() {
            let color = legend_color(slot)?;
            fills.push(FillDef::Solid(color));
            cell_xfs.push(CellXfDef::plain(
                FONT_NORMAL,
                FIRST_PALETTE_FILL + slot,
                BORDER_BOX,
            ));
            dxfs.push(DxfDef { bg_color: color });
        }

        Ok(Self {
            fonts,
            fills,
            borders,
            cell_xfs,
            dxfs,
        })
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    pub fn fill_count(&self) -> usize {
        self.fills.len()
    }

    pub fn border_count(&self) -> usize {
        self.borders.len()
    }

    pub fn cell_xf_count(&self) -> usize {
        self.cell_xfs.len()
    }

    pub fn dxf_count(&self) -> usize {
        self.dxfs.len()
    }

    /// Whether a cell style index resolves to a `cellXfs` record.
    pub fn has_cell_xf(&self, idx: u32) -> bool {
        usize::try_from(idx).is_ok_and(|i| i < self.cell_xfs.len())
    }

    pub fn has_dxf(&self, idx: u32) -> bool {
        usize::try_from(idx).is_ok_and(|i| i < self.dxfs.len())
    }

    /// Serialize to `xl/styles.xml`.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(4096);
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(&format!(r#"<styleSheet xmlns="{NS_SPREADSHEET}">"#));

        // Fonts
        xml.push_str(&format!(r#"<fonts count="{}">"#, self.fonts.len()));
        for font in &self.fonts {
            xml.push_str("<font>");
            if font.bold {
                xml.push_str("<b/>");
            }
            xml.push_str(&format!(r#"<sz val="{}"/>"#, font.size));
            xml.push_str(r#"<color theme="1"/><name val="Calibri"/><family val="2"/>"#);
            xml.push_str("</font>");
        }
        xml.push_str("</fonts>");

        // Fills
        xml.push_str(&format!(r#"<fills count="{}">"#, self.fills.len()));
        for fill in &self.fills {
            match fill {
                FillDef::None => xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#),
                FillDef::Gray125 => {
                    xml.push_str(r#"<fill><patternFill patternType="gray125"/></fill>"#)
                }
                FillDef::Solid(color) => xml.push_str(&format!(
                    r#"<fill><patternFill patternType="solid"><fgColor rgb="{}"/><bgColor indexed="64"/></patternFill></fill>"#,
                    escape_xml(color)
                )),
            }
        }
        xml.push_str("</fills>");

        // Borders
        xml.push_str(&format!(r#"<borders count="{}">"#, self.borders.len()));
        for border in &self.borders {
            match border {
                BorderDef::None => {
                    xml.push_str("<border><left/><right/><top/><bottom/><diagonal/></border>")
                }
                BorderDef::ThinBox => xml.push_str(
                    r#"<border><left style="thin"/><right style="thin"/><top style="thin"/><bottom style="thin"/><diagonal/></border>"#,
                ),
                BorderDef::ThinBottom => xml.push_str(
                    r#"<border><left/><right/><top/><bottom style="thin"/><diagonal/></border>"#,
                ),
            }
        }
        xml.push_str("</borders>");

        // Cell style formats (cellStyleXfs) - required
        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        // Cell formats (cellXfs)
        xml.push_str(&format!(r#"<cellXfs count="{}">"#, self.cell_xfs.len()));
        for xf in &self.cell_xfs {
            let mut attrs = format!(
                r#"numFmtId="0" fontId="{}" fillId="{}" borderId="{}" xfId="0""#,
                xf.font_id, xf.fill_id, xf.border_id
            );
            if xf.font_id > 0 {
                attrs.push_str(r#" applyFont="1""#);
            }
            if xf.fill_id > 0 {
                attrs.push_str(r#" applyFill="1""#);
            }
            if xf.border_id > 0 {
                attrs.push_str(r#" applyBorder="1""#);
            }

            match &xf.alignment {
                Some(align) => {
                    attrs.push_str(r#" applyAlignment="1""#);
                    xml.push_str(&format!("<xf {attrs}>"));
                    xml.push_str(&format!(
                        r#"<alignment horizontal="{}" vertical="{}""#,
                        align.horizontal, align.vertical
                    ));
                    if align.wrap_text {
                        xml.push_str(r#" wrapText="1""#);
                    }
                    xml.push_str("/></xf>");
                }
                None => xml.push_str(&format!("<xf {attrs}/>")),
            }
        }
        xml.push_str("</cellXfs>");

        // Cell styles - required
        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);

        // Differential formats for conditional formatting
        xml.push_str(&format!(r#"<dxfs count="{}">"#, self.dxfs.len()));
        for dxf in &self.dxfs {
            xml.push_str(&format!(
                r#"<dxf><fill><patternFill patternType="solid"><bgColor rgb="{}"/></patternFill></fill></dxf>"#,
                escape_xml(dxf.bg_color)
            ));
        }
        xml.push_str("</dxfs>");

        xml.push_str("</styleSheet>");
        xml
    }
}

/// Build `xl/styles.xml` for `slots` legend entries.
pub fn build_style_table(slots: SlotCount) -> Result<Vec<u8>> {
    Ok(StyleTable::for_slots(slots)?.to_xml().into_bytes())
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
    fn test_counts_grow_with_slots() {
        for n in SlotCount::MIN..=SlotCount::MAX {
            let table = StyleTable::for_slots(SlotCount::new(n).unwrap()).unwrap();
            let n = usize::try_from(n).unwrap();
            assert_eq!(table.font_count(), 5);
            assert_eq!(table.border_count(), 3);
            assert_eq!(table.fill_count(), 5 + n);
            assert_eq!(table.cell_xf_count(), 7 + n);
            assert_eq!(table.dxf_count(), n);
        }
    }

    #[test]
    fn test_swatch_points_at_its_palette_fill() {
        let table = StyleTable::for_slots(SlotCount::new(4).unwrap()).unwrap();
        for slot in 0..4 {
            let xf = &table.cell_xfs[usize::try_from(StyleId::swatch(slot)).unwrap()];
            let fill = &table.fills[usize::try_from(xf.fill_id).unwrap()];
            assert_eq!(fill, &FillDef::Solid(LEGEND_PALETTE[usize::try_from(slot).unwrap()]));
            assert!(table.has_dxf(dxf_index(slot)));
        }
        assert!(!table.has_cell_xf(StyleId::swatch(4)));
        assert!(!table.has_dxf(dxf_index(4)));
    }

    #[test]
    fn test_xml_counts_match_lists() {
        let xml = StyleTable::for_slots(SlotCount::new(2).unwrap())
            .unwrap()
            .to_xml();
        assert!(xml.contains(r#"<fonts count="5">"#));
        assert!(xml.contains(r#"<fills count="7">"#));
        assert!(xml.contains(r#"<cellXfs count="9">"#));
        assert!(xml.contains(r#"<dxfs count="2">"#));
        assert!(xml.contains(r#"<bgColor rgb="FF228B22"/>"#));
        assert_eq!(xml.matches("<xf ").count(), 1 + 9);
    }
}
