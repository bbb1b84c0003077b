// crates/shopdash/src/commands/fields.rs

use std::path::Path;

use anyhow::Result;
use shopdash_core::Field;

use super::load_dataset;
use crate::render;

pub fn handle_fields_command(source: &Path) -> Result<()> {
    let dataset = load_dataset(source)?;

    println!("{}", render::fields_table(&dataset));

    for dimension in [Field::Branch, Field::ProductLine] {
        match dataset.distinct_values(dimension).into_option() {
            Some(values) => println!("{dimension}: {}", values.join(", ")),
            None => println!("{dimension}: unavailable"),
        }
    }
    Ok(())
}
