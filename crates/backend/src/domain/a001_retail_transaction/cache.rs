use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

use super::dataset::CanonicalDataset;
use super::error::DataLoadError;
use super::loader::load_canonical;

/// Load-once holder of the canonical dataset.
///
/// Owned by the hosting process and shared read-only with request handlers.
/// The first successful load is kept for the lifetime of the process; a
/// failed load leaves the cache empty so the next call retries.
#[derive(Debug)]
pub struct DatasetCache {
    source: PathBuf,
    dataset: OnceCell<CanonicalDataset>,
}

impl DatasetCache {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dataset: OnceCell::new(),
        }
    }

    /// Cache that is already populated, no source file involved.
    pub fn preloaded(dataset: CanonicalDataset) -> Self {
        Self {
            source: PathBuf::new(),
            dataset: OnceCell::with_value(dataset),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.get().is_some()
    }

    /// The dataset if it is already in memory. Never touches the source.
    pub fn get(&self) -> Option<&CanonicalDataset> {
        self.dataset.get()
    }

    pub fn get_or_load(&self) -> Result<&CanonicalDataset, DataLoadError> {
        self.dataset.get_or_try_init(|| {
            tracing::info!("Loading dataset from {}", self.source.display());
            load_canonical(&self.source)
        })
    }
}
