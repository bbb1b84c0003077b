#![allow(dead_code)]

use std::path::{Path, PathBuf};

use shopdash_core::{Dataset, SourceKey};
use shopdash_parser::{read_table_file, RawTable};

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../shopdash-parser/tests/data")
        .join(name)
}

pub fn fixture_table(name: &str) -> RawTable {
    read_table_file(fixture_path(name)).expect("read fixture")
}

pub fn dataset_from(table: &RawTable) -> Dataset {
    Dataset::from_table(table, SourceKey::in_memory(table.content_hash.clone()))
}

pub fn fixture_dataset(name: &str) -> Dataset {
    dataset_from(&fixture_table(name))
}

pub fn inline_dataset(headers: &[&str], rows: &[&[&str]]) -> Dataset {
    let table = RawTable::new(
        headers.iter().map(|header| header.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    );
    dataset_from(&table)
}

pub fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.unwrap_or_else(|| panic!("expected {expected}, got no value"));
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
