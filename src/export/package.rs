//! Package plumbing: content types, relationships and the workbook part.
//!
//! Every manifest part is derived from a single [`PackagePlan`], so the
//! relationship ids in `workbook.xml` always have entries in
//! `workbook.xml.rels` and every `Override` names a part that is emitted.

use crate::layout::{CALENDAR_SHEET_NAME, INSTRUCTIONS_SHEET_NAME, TRACKER_SHEET_NAME};
use crate::namespaces::{
    CT_DRAWING, CT_RELATIONSHIPS, CT_STYLES, CT_WORKBOOK, CT_WORKSHEET, CT_XML, NS_CONTENT_TYPES,
    NS_OFFICE_RELATIONSHIPS, NS_RELATIONSHIPS, NS_SPREADSHEET, REL_DRAWING, REL_STYLES,
    REL_WORKBOOK, REL_WORKSHEET,
};
use crate::xml::{escape_xml, XML_DECLARATION};

use super::ArchivePart;

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub const ROOT_RELS_PART: &str = "_rels/.rels";
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
pub const STYLES_PART: &str = "xl/styles.xml";
pub const DRAWING_PART: &str = "xl/drawings/drawing1.xml";
pub const CALENDAR_SHEET_RELS_PART: &str = "xl/worksheets/_rels/sheet2.xml.rels";

/// Relationship id of the drawing inside the calendar sheet's rels.
pub const DRAWING_REL_ID: &str = "rId1";
const STYLES_REL_ID: &str = "rId4";

pub const CALENDAR_TAB_COLOR: &str = "FF00B050";
pub const TRACKER_TAB_COLOR: &str = "FF7030A0";

/// Which optional parts a package contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageOptions {
    pub include_instructions: bool,
    pub include_tracker: bool,
    /// Calendar sheet carries a legend drawing
    pub include_drawing: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            include_instructions: true,
            include_tracker: false,
            include_drawing: false,
        }
    }
}

/// One worksheet entry in the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSheet {
    pub name: &'static str,
    pub sheet_id: u32,
    pub rel_id: String,
    /// Archive path, e.g. `xl/worksheets/sheet2.xml`
    pub part_name: String,
    pub tab_color: Option<&'static str>,
}

impl PlannedSheet {
    fn new(name: &'static str, sheet_id: u32, tab_color: Option<&'static str>) -> Self {
        Self {
            name,
            sheet_id,
            rel_id: format!("rId{sheet_id}"),
            part_name: format!("xl/worksheets/sheet{sheet_id}.xml"),
            tab_color,
        }
    }

    /// Target relative to `xl/`, as written in `workbook.xml.rels`.
    fn rel_target(&self) -> &str {
        self.part_name
            .strip_prefix("xl/")
            .unwrap_or(&self.part_name)
    }
}

/// The complete list of worksheets and auxiliary parts for one package.
///
/// Sheet numbers are fixed: Instructions is sheet1, Calendar sheet2 and
/// Tracker sheet3, whichever of them are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePlan {
    sheets: Vec<PlannedSheet>,
    include_drawing: bool,
}

impl PackagePlan {
    pub fn new(options: &PackageOptions) -> Self {
        let mut sheets = Vec::with_capacity(3);
        if options.include_instructions {
            sheets.push(PlannedSheet::new(INSTRUCTIONS_SHEET_NAME, 1, None));
        }
        sheets.push(PlannedSheet::new(
            CALENDAR_SHEET_NAME,
            2,
            Some(CALENDAR_TAB_COLOR),
        ));
        if options.include_tracker {
            sheets.push(PlannedSheet::new(
                TRACKER_SHEET_NAME,
                3,
                Some(TRACKER_TAB_COLOR),
            ));
        }
        Self {
            sheets,
            include_drawing: options.include_drawing,
        }
    }

    pub fn sheets(&self) -> &[PlannedSheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&PlannedSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn include_drawing(&self) -> bool {
        self.include_drawing
    }

    /// Every part path the archive must contain, in write order.
    pub fn part_names(&self) -> Vec<String> {
        let mut names = vec![
            CONTENT_TYPES_PART.to_string(),
            ROOT_RELS_PART.to_string(),
            WORKBOOK_PART.to_string(),
            WORKBOOK_RELS_PART.to_string(),
            STYLES_PART.to_string(),
        ];
        names.extend(self.sheets.iter().map(|s| s.part_name.clone()));
        if self.include_drawing {
            names.push(CALENDAR_SHEET_RELS_PART.to_string());
            names.push(DRAWING_PART.to_string());
        }
        names
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{NS_CONTENT_TYPES}">"#));
        xml.push_str(&format!(
            r#"<Default Extension="rels" ContentType="{CT_RELATIONSHIPS}"/>"#
        ));
        xml.push_str(&format!(r#"<Default Extension="xml" ContentType="{CT_XML}"/>"#));
        push_override(&mut xml, WORKBOOK_PART, CT_WORKBOOK);
        for sheet in &self.sheets {
            push_override(&mut xml, &sheet.part_name, CT_WORKSHEET);
        }
        push_override(&mut xml, STYLES_PART, CT_STYLES);
        if self.include_drawing {
            push_override(&mut xml, DRAWING_PART, CT_DRAWING);
        }
        xml.push_str("</Types>");
        xml
    }

    fn root_rels_xml(&self) -> String {
        let mut xml = rels_open();
        push_relationship(&mut xml, "rId1", REL_WORKBOOK, WORKBOOK_PART);
        xml.push_str("</Relationships>");
        xml
    }

    fn workbook_xml(&self) -> String {
        let mut xml = String::with_capacity(512);
        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<workbook xmlns="{NS_SPREADSHEET}" xmlns:r="{NS_OFFICE_RELATIONSHIPS}">"#
        ));
        xml.push_str("<sheets>");
        for sheet in &self.sheets {
            xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="{}"/>"#,
                escape_xml(sheet.name),
                sheet.sheet_id,
                sheet.rel_id
            ));
        }
        xml.push_str("</sheets>");
        xml.push_str("</workbook>");
        xml
    }

    fn workbook_rels_xml(&self) -> String {
        let mut xml = rels_open();
        for sheet in &self.sheets {
            push_relationship(&mut xml, &sheet.rel_id, REL_WORKSHEET, sheet.rel_target());
        }
        push_relationship(&mut xml, STYLES_REL_ID, REL_STYLES, "styles.xml");
        xml.push_str("</Relationships>");
        xml
    }

    fn calendar_sheet_rels_xml(&self) -> Option<String> {
        if !self.include_drawing {
            return None;
        }
        let mut xml = rels_open();
        push_relationship(
            &mut xml,
            DRAWING_REL_ID,
            REL_DRAWING,
            "../drawings/drawing1.xml",
        );
        xml.push_str("</Relationships>");
        Some(xml)
    }

    /// Render all manifest parts for this plan.
    pub fn manifest_parts(&self) -> ManifestParts {
        ManifestParts {
            content_types: self.content_types_xml(),
            root_rels: self.root_rels_xml(),
            workbook: self.workbook_xml(),
            workbook_rels: self.workbook_rels_xml(),
            calendar_sheet_rels: self.calendar_sheet_rels_xml(),
        }
    }
}

fn rels_open() -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<Relationships xmlns="{NS_RELATIONSHIPS}">"#));
    xml
}

fn push_relationship(xml: &mut String, id: &str, rel_type: &str, target: &str) {
    xml.push_str(&format!(
        r#"<Relationship Id="{}" Type="{rel_type}" Target="{}"/>"#,
        escape_xml(id),
        escape_xml(target)
    ));
}

fn push_override(xml: &mut String, part_name: &str, content_type: &str) {
    xml.push_str(&format!(
        r#"<Override PartName="/{}" ContentType="{content_type}"/>"#,
        escape_xml(part_name)
    ));
}

/// The fixed auxiliary parts of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestParts {
    pub content_types: String,
    pub root_rels: String,
    pub workbook: String,
    pub workbook_rels: String,
    /// Calendar sheet relationships, present with a legend drawing
    pub calendar_sheet_rels: Option<String>,
}

impl ManifestParts {
    /// Archive parts in the order they are written.
    pub fn into_parts(self) -> Vec<ArchivePart> {
        let mut parts = vec![
            ArchivePart::new(CONTENT_TYPES_PART, self.content_types),
            ArchivePart::new(ROOT_RELS_PART, self.root_rels),
            ArchivePart::new(WORKBOOK_PART, self.workbook),
            ArchivePart::new(WORKBOOK_RELS_PART, self.workbook_rels),
        ];
        if let Some(rels) = self.calendar_sheet_rels {
            parts.push(ArchivePart::new(CALENDAR_SHEET_RELS_PART, rels));
        }
        parts
    }
}

/// Build the manifest parts for a package.
pub fn build_package_manifest_parts(options: &PackageOptions) -> ManifestParts {
    PackagePlan::new(options).manifest_parts()
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
    fn test_tracker_is_optional() {
        let without = build_package_manifest_parts(&PackageOptions::default());
        assert!(!without.workbook.contains("Tracker"));
        assert!(!without.workbook_rels.contains("sheet3.xml"));
        assert!(!without.content_types.contains("sheet3.xml"));

        let with = build_package_manifest_parts(&PackageOptions {
            include_tracker: true,
            ..PackageOptions::default()
        });
        assert!(with
            .workbook
            .contains(r#"<sheet name="Tracker" sheetId="3" r:id="rId3"/>"#));
        assert!(with.workbook_rels.contains(r#"Id="rId3""#));
        assert!(with.content_types.contains(r#"PartName="/xl/worksheets/sheet3.xml""#));
    }

    #[test]
    fn test_workbook_rel_ids_resolve() {
        let plan = PackagePlan::new(&PackageOptions {
            include_instructions: true,
            include_tracker: true,
            include_drawing: true,
        });
        let parts = plan.manifest_parts();
        for sheet in plan.sheets() {
            assert!(parts.workbook.contains(&format!(r#"r:id="{}""#, sheet.rel_id)));
            assert!(parts.workbook_rels.contains(&format!(
                r#"Id="{}" Type="{REL_WORKSHEET}" Target="{}""#,
                sheet.rel_id,
                sheet.rel_target()
            )));
        }
        assert!(parts.workbook_rels.contains(r#"Target="styles.xml""#));
    }

    #[test]
    fn test_overrides_name_emitted_parts() {
        let plan = PackagePlan::new(&PackageOptions {
            include_instructions: false,
            include_tracker: true,
            include_drawing: true,
        });
        let names = plan.part_names();
        let parts = plan.manifest_parts();
        for chunk in parts.content_types.split("PartName=\"/").skip(1) {
            let part = chunk.split('"').next().unwrap();
            assert!(names.iter().any(|n| n == part), "{part} is not emitted");
        }
        assert!(!names.iter().any(|n| n == "xl/worksheets/sheet1.xml"));
    }

    #[test]
    fn test_drawing_relationship_lives_on_calendar_sheet() {
        let parts = build_package_manifest_parts(&PackageOptions {
            include_drawing: true,
            ..PackageOptions::default()
        });
        let rels = parts.calendar_sheet_rels.clone().unwrap();
        assert!(rels.contains(r#"Id="rId1""#));
        assert!(rels.contains(r#"Target="../drawings/drawing1.xml""#));
        assert!(parts
            .content_types
            .contains(&format!(r#"PartName="/{DRAWING_PART}" ContentType="{CT_DRAWING}""#)));
        assert!(!parts.workbook_rels.contains("drawing"));
        let names: Vec<String> = parts.into_parts().into_iter().map(|p| p.name).collect();
        assert!(names.contains(&CALENDAR_SHEET_RELS_PART.to_string()));
    }
}
