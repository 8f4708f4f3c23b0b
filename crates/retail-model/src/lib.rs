//! Data model for the retail ETL pipeline.
//!
//! - [`DatasetName`] and [`DatasetCatalog`]: the fixed set of logical datasets
//!   and the files backing them
//! - [`Dataset`] and [`DatasetState`]: a loaded table and its progress
//! - [`ColumnKind`]: the numeric/text type tag driving null imputation
//! - [`Registry`]: the insertion-ordered working set shared by all stages

pub mod catalog;
pub mod dataset;
pub mod error;
pub mod ids;
pub mod registry;

pub use catalog::{CatalogEntry, DatasetCatalog};
pub use dataset::{ColumnKind, Dataset, DatasetState};
pub use error::{ModelError, Result};
pub use ids::DatasetName;
pub use registry::Registry;
