//! Common test utilities for reading generated workbooks back.
//!
//! Archives are opened with the `zip` crate (an independent reader) and
//! parts are inspected with `quick-xml`, so the tests never trust the
//! writer's own view of what it produced.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

// ============================================================================
// Archive helpers
// ============================================================================

/// Read every entry of an archive into `name -> UTF-8 text`.
///
/// Panics if the archive cannot be opened, an entry fails its CRC check,
/// or an entry is not UTF-8.
#[must_use]
pub fn read_parts(data: &[u8]) -> BTreeMap<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).expect("Failed to open ZIP archive");
    let mut parts = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).expect("Failed to open entry");
        let mut content = String::new();
        file.read_to_string(&mut content)
            .unwrap_or_else(|e| panic!("Failed to read {}: {e}", file.name()));
        parts.insert(file.name().to_string(), content);
    }
    parts
}

/// Entry names in archive order.
#[must_use]
pub fn entry_names(data: &[u8]) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).expect("Failed to open ZIP archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

pub fn part<'a>(parts: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    parts
        .get(name)
        .unwrap_or_else(|| panic!("missing part {name}"))
}

pub fn u16_at(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

pub fn u32_at(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

// ============================================================================
// XML helpers
// ============================================================================

/// Panic unless `xml` parses start to finish with matching end tags.
pub fn assert_well_formed(name: &str, xml: &str) {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0i32;
    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => depth -= 1,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!(
                "{name} is not well-formed at {}: {e}",
                reader.buffer_position()
            ),
        }
    }
    assert_eq!(depth, 0, "{name} has unclosed elements");
}

fn attrs_of(e: &BytesStart) -> HashMap<String, String> {
    e.attributes()
        .flatten()
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.as_ref()).into_owned(),
                a.unescape_value().unwrap().into_owned(),
            )
        })
        .collect()
}

/// Attributes of every element with this local name, in document order.
#[must_use]
pub fn elements(xml: &str, local_name: &str) -> Vec<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e) | Event::Empty(ref e))
                if e.local_name().as_ref() == local_name.as_bytes() =>
            {
                found.push(attrs_of(e));
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    found
}

/// Text content of every element with this local name.
#[must_use]
pub fn element_texts(xml: &str, local_name: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();
    let mut inside = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == local_name.as_bytes() => {
                inside = true;
                texts.push(String::new());
            }
            Ok(Event::Text(ref t)) if inside => {
                if let Some(last) = texts.last_mut() {
                    last.push_str(&t.unescape().unwrap());
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == local_name.as_bytes() => {
                inside = false;
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    texts
}

/// One `<c>` element read back from a worksheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellInfo {
    pub style: u32,
    pub cell_type: Option<String>,
    /// Text of `<v>` or `<is><t>`
    pub value: Option<String>,
    pub formula: Option<String>,
}

/// Cells of a worksheet keyed by reference (`"E3"`), plus row order.
#[derive(Debug, Default)]
pub struct SheetCells {
    pub cells: HashMap<String, CellInfo>,
    /// Row numbers in document order
    pub rows: Vec<u32>,
    /// Cell references per row, in document order
    pub row_cells: Vec<Vec<String>>,
}

impl SheetCells {
    pub fn get(&self, reference: &str) -> Option<&CellInfo> {
        self.cells.get(reference)
    }

    pub fn value(&self, reference: &str) -> Option<&str> {
        self.cells.get(reference).and_then(|c| c.value.as_deref())
    }
}

/// Read every cell of a worksheet part.
#[must_use]
pub fn read_cells(xml: &str) -> SheetCells {
    let mut reader = Reader::from_str(xml);
    let mut sheet = SheetCells::default();
    let mut current: Option<(String, CellInfo)> = None;
    let mut capture: Option<&'static str> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => open_row(&mut sheet, e),
                b"c" => current = Some(open_cell(e)),
                b"v" | b"t" => capture = Some("value"),
                b"f" => capture = Some("formula"),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"row" => open_row(&mut sheet, e),
                b"c" => {
                    let (r, info) = open_cell(e);
                    push_cell(&mut sheet, r, info);
                }
                _ => {}
            },
            Ok(Event::Text(ref t)) => {
                if let (Some(field), Some((_, info))) = (capture, current.as_mut()) {
                    let text = t.unescape().unwrap().into_owned();
                    match field {
                        "formula" => info.formula = Some(text),
                        _ => info.value = Some(text),
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"c" => {
                    if let Some((r, info)) = current.take() {
                        push_cell(&mut sheet, r, info);
                    }
                }
                b"v" | b"t" | b"f" => capture = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => panic!("worksheet parse error: {e}"),
            _ => {}
        }
    }
    sheet
}

fn open_row(sheet: &mut SheetCells, e: &BytesStart) {
    let attrs = attrs_of(e);
    sheet.rows.push(attrs["r"].parse().unwrap());
    sheet.row_cells.push(Vec::new());
}

fn open_cell(e: &BytesStart) -> (String, CellInfo) {
    let attrs = attrs_of(e);
    let info = CellInfo {
        style: attrs.get("s").map_or(0, |s| s.parse().unwrap()),
        cell_type: attrs.get("t").cloned(),
        value: None,
        formula: None,
    };
    (attrs["r"].clone(), info)
}

fn push_cell(sheet: &mut SheetCells, r: String, info: CellInfo) {
    if let Some(row) = sheet.row_cells.last_mut() {
        row.push(r.clone());
    }
    let previous = sheet.cells.insert(r.clone(), info);
    assert!(previous.is_none(), "duplicate cell address {r}");
}

/// Split a reference like `AB12` into its column number (1-based) and row.
#[must_use]
pub fn split_ref(reference: &str) -> (u32, u32) {
    let letters: String = reference.chars().take_while(char::is_ascii_alphabetic).collect();
    let digits: String = reference.chars().skip_while(char::is_ascii_alphabetic).collect();
    let col = letters
        .bytes()
        .fold(0u32, |acc, b| acc * 26 + u32::from(b - b'A' + 1));
    (col, digits.parse().unwrap())
}
