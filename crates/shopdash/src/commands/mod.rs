pub mod fields;
pub mod report;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use shopdash_core::cache::DatasetCache;
use shopdash_core::Dataset;

pub(crate) fn load_dataset(source: &Path) -> Result<Arc<Dataset>> {
    let mut cache = DatasetCache::new();
    cache
        .load(source)
        .with_context(|| format!("failed to load sales data from {}", source.display()))
}
