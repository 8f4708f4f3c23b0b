//! Summary of a pipeline run.
//!
//! [`summarize`] reads the registry and never changes it. Only datasets that
//! were normalized are counted.

mod summary;

pub use summary::{ColumnPreview, DatasetSummary, PREVIEW_COLUMNS, Report, summarize};
