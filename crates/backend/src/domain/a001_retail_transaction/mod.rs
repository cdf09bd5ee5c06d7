pub mod cache;
pub mod dataset;
pub mod error;
pub mod loader;

pub use cache::DatasetCache;
pub use dataset::CanonicalDataset;
pub use error::{DataLoadError, DateParseError};
pub use loader::{load_canonical, load_canonical_from_csv};
