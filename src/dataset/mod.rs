//! Job skills dataset: typed records, lookups and CSV loading

pub mod loader;
pub mod record;

pub use loader::DatasetLoader;
pub use record::{DatasetSummary, JobDataset, JobRecord};
