use std::fs;
use std::path::PathBuf;

use crate::errors::ParserError;
use crate::formats::DelimitedParser;
use crate::registry::TableParser;
use crate::{parse_table, parse_with_parsers, read_table_file};

fn fixture_path(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(path)
}

fn fixture(path: &str) -> String {
    let full_path = fixture_path(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn parses_comma_separated_sales_export() {
    let content = fixture("supermarket_sales.csv");
    let table = parse_table(&content).expect("supermarket parse failed");

    assert_eq!(table.format, "CSV");
    assert_eq!(table.column_count(), 17);
    assert_eq!(table.row_count(), 8);
    assert_eq!(table.headers[1], "Branch");
    assert_eq!(table.cell(0, 0), Some("INV-001"));
    assert_eq!(table.cell(7, 10), Some("unknown"));
    assert!(!table.content_hash.is_empty());
}

#[test]
fn parses_semicolon_separated_orders() {
    let content = fixture("orders_semicolon.csv");
    let table = parse_table(&content).expect("semicolon parse failed");

    assert_eq!(table.format, "SEMICOLON");
    assert_eq!(table.headers[0], "Order ID");
    assert_eq!(table.row_count(), 5);
    let products: Vec<&str> = table.column(2).collect();
    assert_eq!(products, vec!["Widget", "Gadget", "Widget", "Gizmo", "Widget"]);
}

#[test]
fn keeps_raw_header_text() {
    let table = parse_table(&fixture("minimal_sales.csv")).expect("minimal parse failed");

    assert_eq!(table.headers[0], " Branch ");
    assert_eq!(table.headers[4], "branch");
}

#[test]
fn header_only_file_is_an_empty_table() {
    let table = read_table_file(fixture_path("header_only.csv")).expect("header-only parse failed");

    assert_eq!(table.column_count(), 3);
    assert!(table.is_empty());
}

#[test]
fn zero_byte_input_has_no_columns() {
    let table = parse_table("").expect("empty input should parse");

    assert_eq!(table.column_count(), 0);
    assert_eq!(table.row_count(), 0);
}

#[test]
fn short_rows_are_padded_and_blank_rows_skipped() {
    let content = "Branch,Total,Rating\nA,10\n,,\nB,20,4.0\n";
    let table = parse_table(content).expect("padded parse failed");

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0], vec!["A", "10", ""]);
    assert_eq!(table.cell(1, 2), Some("4.0"));
}

#[test]
fn long_rows_are_rejected() {
    let content = "Branch,Total\nA,10,extra\n";
    let err = parse_table(content).expect_err("long row should fail");

    match err {
        ParserError::DataRow { line_index, .. } => assert_eq!(line_index, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn tab_parser_rejects_comma_header() {
    let err = DelimitedParser::tab()
        .parse("Branch,Total\nA,1\n")
        .expect_err("tab parser should not claim comma content");

    assert!(matches!(err, ParserError::FormatMismatch { parser: "TSV", .. }));
}

#[test]
fn registry_reports_every_attempt_when_nothing_matches() {
    let tab = DelimitedParser::tab();
    let semicolon = DelimitedParser::semicolon();
    let parsers: [&dyn TableParser; 2] = [&tab, &semicolon];

    let err = parse_with_parsers("Branch,Total\nA,1\n", &parsers).expect_err("no parser matches");
    match err {
        ParserError::NoMatchingParser { attempts } => {
            let names: Vec<&str> = attempts.iter().map(|attempt| attempt.parser).collect();
            assert_eq!(names, vec!["TSV", "SEMICOLON"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_table_file(fixture_path("does_not_exist.csv")).expect_err("missing file");
    assert!(matches!(err, ParserError::Io { .. }));
}

#[test]
fn identical_content_hashes_identically() {
    let content = fixture("minimal_sales.csv");
    let first = parse_table(&content).unwrap();
    let second = parse_table(&content).unwrap();
    let other = parse_table(&fixture("orders_semicolon.csv")).unwrap();

    assert_eq!(first.content_hash, second.content_hash);
    assert_ne!(first.content_hash, other.content_hash);
}
