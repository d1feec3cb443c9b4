//! Cross-reference tests for generated packages.
//!
//! Every relationship id used by a part must resolve in the matching rels
//! file, every rels target and content-type override must name an entry
//! that exists, and every style / DXF index must land inside styles.xml.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::collections::BTreeMap;

use common::{assert_well_formed, element_texts, elements, read_cells, read_parts};
use test_case::test_case;
use xlcal::{build_document, build_package_manifest_parts, CalendarRequest, LegendMode, PackageOptions};

fn generate(tracker: bool, drawing: bool, instructions: bool) -> BTreeMap<String, String> {
    let mut request = CalendarRequest::new(2024, 1, 3);
    request.include_tracker = tracker;
    request.include_instructions = instructions;
    if drawing {
        request.legend_mode = LegendMode::Drawing;
    }
    read_parts(&build_document(&request).unwrap())
}

/// Resolve a relationship target against the directory of the rels owner.
fn resolve(base_dir: &str, target: &str) -> String {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for piece in target.split('/') {
        match piece {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[test_case(false, false, true ; "plain")]
#[test_case(true, false, true ; "tracker")]
#[test_case(false, true, true ; "drawing")]
#[test_case(true, true, true ; "tracker and drawing")]
#[test_case(true, true, false ; "no instructions")]
fn test_all_parts_well_formed(tracker: bool, drawing: bool, instructions: bool) {
    for (name, xml) in &generate(tracker, drawing, instructions) {
        assert_well_formed(name, xml);
    }
}

#[test_case(false, false, true ; "plain")]
#[test_case(true, false, true ; "tracker")]
#[test_case(false, true, true ; "drawing")]
#[test_case(true, true, true ; "tracker and drawing")]
#[test_case(true, true, false ; "no instructions")]
fn test_overrides_name_existing_parts(tracker: bool, drawing: bool, instructions: bool) {
    let parts = generate(tracker, drawing, instructions);
    let overrides = elements(&parts["[Content_Types].xml"], "Override");
    for o in &overrides {
        let name = o["PartName"].trim_start_matches('/');
        assert!(parts.contains_key(name), "override {name} has no part");
    }
    // Every XML part other than rels is covered by an override
    for name in parts.keys() {
        if name.ends_with(".rels") || name == "[Content_Types].xml" {
            continue;
        }
        assert!(
            overrides.iter().any(|o| o["PartName"] == format!("/{name}")),
            "{name} has no override"
        );
    }
}

#[test_case(false, false, true ; "plain")]
#[test_case(true, true, true ; "tracker and drawing")]
#[test_case(true, false, false ; "no instructions")]
fn test_relationship_targets_exist(tracker: bool, drawing: bool, instructions: bool) {
    let parts = generate(tracker, drawing, instructions);
    let rels_files = [
        ("_rels/.rels", ""),
        ("xl/_rels/workbook.xml.rels", "xl"),
        ("xl/worksheets/_rels/sheet2.xml.rels", "xl/worksheets"),
    ];
    for (rels, base) in rels_files {
        let Some(xml) = parts.get(rels) else {
            assert!(!drawing || rels != "xl/worksheets/_rels/sheet2.xml.rels");
            continue;
        };
        for rel in elements(xml, "Relationship") {
            let target = resolve(base, &rel["Target"]);
            assert!(parts.contains_key(&target), "{rels}: {target} missing");
        }
    }
}

#[test_case(false ; "without tracker")]
#[test_case(true ; "with tracker")]
fn test_workbook_ids_resolve(tracker: bool) {
    let parts = generate(tracker, false, true);
    let rels = elements(&parts["xl/_rels/workbook.xml.rels"], "Relationship");
    let sheets = elements(&parts["xl/workbook.xml"], "sheet");
    assert_eq!(sheets.len(), if tracker { 3 } else { 2 });
    for sheet in &sheets {
        let rel = rels
            .iter()
            .find(|r| r["Id"] == sheet["r:id"])
            .unwrap_or_else(|| panic!("no relationship for {}", sheet["name"]));
        assert!(rel["Type"].ends_with("/worksheet"));
    }
    let names: Vec<&str> = sheets.iter().map(|s| s["name"].as_str()).collect();
    let expected: &[&str] = if tracker {
        &["Instructions", "Calendar", "Tracker"]
    } else {
        &["Instructions", "Calendar"]
    };
    assert_eq!(names, expected);
}

#[test]
fn test_drawing_reference_resolves() {
    let parts = generate(false, true, true);
    let drawing = elements(&parts["xl/worksheets/sheet2.xml"], "drawing");
    assert_eq!(drawing.len(), 1);
    let rels = elements(&parts["xl/worksheets/_rels/sheet2.xml.rels"], "Relationship");
    let rel = rels.iter().find(|r| r["Id"] == drawing[0]["r:id"]).unwrap();
    assert!(rel["Type"].ends_with("/drawing"));
    assert_eq!(
        resolve("xl/worksheets", &rel["Target"]),
        "xl/drawings/drawing1.xml"
    );
}

#[test]
fn test_no_drawing_parts_in_cell_mode() {
    let parts = generate(true, false, true);
    assert!(!parts.contains_key("xl/drawings/drawing1.xml"));
    assert!(!parts.contains_key("xl/worksheets/_rels/sheet2.xml.rels"));
    assert!(!parts["[Content_Types].xml"].contains("drawing"));
}

#[test_case(1)]
#[test_case(5)]
#[test_case(9)]
fn test_style_indices_resolve(slots: u32) {
    let mut request = CalendarRequest::new(2024, 1, slots);
    request.include_tracker = true;
    let parts = read_parts(&build_document(&request).unwrap());
    let styles = &parts["xl/styles.xml"];

    let xf_count: u32 = elements(styles, "cellXfs")[0]["count"].parse().unwrap();
    let dxf_count: u32 = elements(styles, "dxfs")[0]["count"].parse().unwrap();
    assert_eq!(dxf_count, slots);
    assert_eq!(xf_count, 7 + slots);

    for sheet in ["sheet1", "sheet2", "sheet3"] {
        let xml = &parts[&format!("xl/worksheets/{sheet}.xml")];
        for (reference, cell) in &read_cells(xml).cells {
            assert!(cell.style < xf_count, "{sheet}!{reference} style {}", cell.style);
        }
        for rule in elements(xml, "cfRule") {
            let dxf: u32 = rule["dxfId"].parse().unwrap();
            assert!(dxf < dxf_count);
        }
    }
}

#[test]
fn test_style_list_counts_match_children() {
    let parts = generate(false, false, true);
    let styles = &parts["xl/styles.xml"];
    for (list, child) in [
        ("fonts", "font"),
        ("fills", "fill"),
        ("borders", "border"),
        ("cellXfs", "xf"),
        ("dxfs", "dxf"),
    ] {
        let declared: usize = elements(styles, list)[0]["count"].parse().unwrap();
        let section_start = styles.find(&format!("<{list} ")).unwrap();
        let section_end = styles.find(&format!("</{list}>")).unwrap();
        let section = &styles[section_start..section_end];
        let actual = elements(section, child).len();
        assert_eq!(declared, actual, "{list}");
    }
}

#[test]
fn test_tracker_formulas_point_at_legend() {
    for (mode, label_rows) in [(LegendMode::Cells, [2, 3, 4]), (LegendMode::Drawing, [2, 4, 6])] {
        let mut request = CalendarRequest::new(2024, 1, 3);
        request.include_tracker = true;
        request.legend_mode = mode;
        let parts = read_parts(&build_document(&request).unwrap());
        let tracker = read_cells(&parts["xl/worksheets/sheet3.xml"]);
        let calendar = read_cells(&parts["xl/worksheets/sheet2.xml"]);

        for (row, label_row) in (2..).zip(label_rows) {
            let a = tracker.get(&format!("A{row}")).unwrap();
            assert_eq!(a.formula.as_deref(), Some(format!("Calendar!I{label_row}").as_str()));
            assert_eq!(a.cell_type.as_deref(), Some("str"));
            let b = tracker.get(&format!("B{row}")).unwrap();
            assert_eq!(
                b.formula.as_deref(),
                Some(format!("COUNTIF(Calendar!A:G,Calendar!I{label_row})").as_str())
            );
            assert_eq!(
                calendar.value(&format!("I{label_row}")),
                Some("Enter Value Here")
            );
        }
    }
}

#[test]
fn test_manifest_matches_generated_package() {
    let options = PackageOptions {
        include_instructions: true,
        include_tracker: true,
        include_drawing: false,
    };
    let manifest = build_package_manifest_parts(&options);
    let parts = generate(true, false, true);
    assert_eq!(manifest.workbook, parts["xl/workbook.xml"]);
    assert_eq!(manifest.workbook_rels, parts["xl/_rels/workbook.xml.rels"]);
    assert_eq!(manifest.content_types, parts["[Content_Types].xml"]);
    assert_eq!(manifest.root_rels, parts["_rels/.rels"]);
}

#[test]
fn test_instructions_sheet() {
    let parts = generate(false, false, true);
    let xml = &parts["xl/worksheets/sheet1.xml"];
    let merges: Vec<String> = elements(xml, "mergeCell")
        .into_iter()
        .map(|m| m["ref"].clone())
        .collect();
    assert_eq!(merges, ["A1:H1", "A2:H25"]);
    let texts = element_texts(xml, "t");
    assert!(texts[0].contains("How to Use"));
    assert!(texts[1].contains("case-insensitive"));
}
