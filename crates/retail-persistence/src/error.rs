//! Persistence error types.
//!
//! Connection URLs in these errors are always redacted; the password never
//! reaches a message.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The store could not be reached before any write was attempted.
    #[error("store unavailable at {target}")]
    ConnectionUnavailable {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// Writing one dataset failed; other datasets are unaffected.
    #[error("failed to persist dataset '{dataset}'")]
    PersistenceFailed {
        dataset: String,
        #[source]
        cause: Box<PersistenceError>,
    },

    /// A column whose values cannot be stored as a number or as text.
    #[error("column '{column}' of type {dtype} cannot be stored")]
    UnsupportedColumn { column: String, dtype: String },

    /// An integer outside the range a double holds exactly.
    #[error("column '{column}' holds {value}, which cannot be stored without rounding")]
    LossyNumeric { column: String, value: String },

    /// A table without columns has no relational form.
    #[error("table has no columns")]
    NoColumns,

    /// Reading values out of the table failed.
    #[error("reading column '{column}'")]
    Column {
        column: String,
        #[source]
        source: PolarsError,
    },

    /// The store rejected a statement.
    #[error("{operation} failed")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The connection settings do not form a valid URL.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),

    /// The private async runtime could not be started.
    #[error("failed to start database runtime")]
    Runtime(#[source] std::io::Error),
}

impl PersistenceError {
    /// Wrap a sink error as the failure of a specific dataset.
    pub fn for_dataset(dataset: impl Into<String>, cause: PersistenceError) -> Self {
        Self::PersistenceFailed {
            dataset: dataset.into(),
            cause: Box::new(cause),
        }
    }

    pub fn is_connection_unavailable(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable { .. })
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_dataset_failure_keeps_cause() {
        let cause = PersistenceError::UnsupportedColumn {
            column: "tags".to_string(),
            dtype: "list[str]".to_string(),
        };
        let err = PersistenceError::for_dataset("amazon_sales", cause);

        assert_eq!(err.to_string(), "failed to persist dataset 'amazon_sales'");
        let source = err.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("column 'tags' of type list[str] cannot be stored")
        );
    }
}
