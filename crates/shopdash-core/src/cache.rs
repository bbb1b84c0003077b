// crates/shopdash-core/src/cache.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use shopdash_parser::read_table_file;
use tracing::{debug, info};

use crate::dataset::{Dataset, SourceKey};
use crate::error::Result;

/// Load-once holder for datasets, keyed by source path and revision.
///
/// A source whose length and modification time are unchanged is served from
/// memory; anything else is re-read and replaces the held dataset.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<Dataset>>,
    loads: usize,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Arc<Dataset>> {
        let path = path.as_ref();
        let probed = SourceKey::probe(path)?;
        let cache_path = probed
            .path
            .clone()
            .unwrap_or_else(|| path.to_path_buf());

        if let Some(dataset) = self.entries.get(&cache_path) {
            if dataset.source().same_revision(&probed) {
                debug!(path = %cache_path.display(), "dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
            info!(path = %cache_path.display(), "source changed, reloading dataset");
        }

        let table = read_table_file(&cache_path)?;
        let source = SourceKey {
            content_hash: table.content_hash.clone(),
            ..probed
        };
        let dataset = Arc::new(Dataset::from_table(&table, source));
        self.entries.insert(cache_path, Arc::clone(&dataset));
        self.loads += 1;

        Ok(dataset)
    }

    /// Drops the held dataset for `path`, if any.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    /// Number of times a source was actually read.
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
