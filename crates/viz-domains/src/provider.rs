//! Data-provider contracts.

use anyhow::Result;
use std::path::PathBuf;
use viz_model::Event;

/// Identifies one dataset a provider can load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetHandle {
    pub study_code: String,
    pub root: PathBuf,
}

impl DatasetHandle {
    pub fn new(study_code: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            study_code: study_code.into(),
            root: root.into(),
        }
    }
}

/// Supplies events of one clinical type for a dataset.
///
/// Loading is total: a dataset with no records of this type yields an empty
/// vector, not an error. Errors are reserved for unreadable/corrupt
/// sources.
pub trait DataProvider<T> {
    fn load_data(&self, dataset: &DatasetHandle) -> Result<Vec<Event<T>>>;
}

/// Providers whose records carry a visit number (tumour-style data) can
/// also load one visit's slice.
pub trait VisitDataProvider<T>: DataProvider<T> {
    fn load_data_by_visit(&self, dataset: &DatasetHandle, visit: f64) -> Result<Vec<Event<T>>>;
}
