//! Per-clinical-domain instantiations of the shared chart engine.
//!
//! Each domain module is deliberately thin: a record struct, a group-by
//! registry, filter factories, a column spec, and a provider. All chart
//! logic lives in `viz-engine`.

pub mod adverse_event;
pub mod csv;
pub mod ctdna;
pub mod lab;
pub mod population;
pub mod provider;
pub mod vital;

pub use provider::{DataProvider, DatasetHandle, VisitDataProvider};
