//! Error types for normalization.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the dataframe engine while rewriting a table.
///
/// Normalization itself has no failure cases; these only surface if Polars
/// rejects an operation on the underlying data.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("column '{column}': {source}")]
    Column {
        column: String,
        #[source]
        source: PolarsError,
    },
    #[error("rebuilding table: {0}")]
    Frame(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
