//! CLI tool for xlcal - writes a calendar workbook to disk
//!
//! Usage:
//!   xlcal_cli --year 2024 --month 1 --slots 3 -o feb.xlsx
//!   xlcal_cli --year 2024 --month 1 --slots 3 --tracker --drawing
//!   xlcal_cli --request request.json -o out.xlsx
//!
//! `--month` is zero-based (0 = January), matching the request JSON.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use xlcal::{build_document, CalendarRequest, LegendMode};

const USAGE: &str = "Usage: xlcal_cli [--year N] [--month 0-11] [--slots 1-9] [--tracker] [--drawing] [--no-cf] [--no-instructions] [--request file.json] [-o output.xlsx]";

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    eprintln!("{USAGE}");
    std::process::exit(1);
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> T {
    let Some(value) = value else {
        fail(&format!("Missing value for {flag}"));
    };
    match value.parse() {
        Ok(v) => v,
        Err(_) => fail(&format!("Invalid value for {flag}: {value}")),
    }
}

fn main() {
    let mut request = CalendarRequest::default();
    let mut output_path: Option<String> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--year" => request.year = parse_value(&arg, args.next()),
            "--month" => request.month = parse_value(&arg, args.next()),
            "--slots" => request.event_rows = parse_value(&arg, args.next()),
            "--tracker" => request.include_tracker = true,
            "--drawing" => request.legend_mode = LegendMode::Drawing,
            "--no-cf" => request.include_conditional_formatting = false,
            "--no-instructions" => request.include_instructions = false,
            "--request" => {
                let path: String = parse_value(&arg, args.next());
                request = match CalendarRequest::from_json_file(&path) {
                    Ok(r) => r,
                    Err(e) => fail(&format!("Error loading {path}: {e}")),
                };
            }
            "-o" | "--output" => output_path = Some(parse_value(&arg, args.next())),
            "-h" | "--help" => {
                println!("{USAGE}");
                return;
            }
            other => fail(&format!("Unknown argument: {other}")),
        }
    }

    if let Err(e) = run(&request, output_path.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(request: &CalendarRequest, output_path: Option<&str>) -> xlcal::Result<()> {
    let bytes = build_document(request)?;
    match output_path {
        Some(path) => {
            fs::write(path, &bytes)?;
            eprintln!("Written: {path} ({} bytes)", bytes.len());
        }
        None => io::stdout().write_all(&bytes)?,
    }
    Ok(())
}
