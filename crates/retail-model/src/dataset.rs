use std::fmt;
use std::path::PathBuf;

use polars::prelude::{Column, DataFrame};

use crate::DatasetName;

/// How far a dataset has progressed through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetState {
    Loaded,
    Normalized,
    Persisted,
}

impl DatasetState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Normalized => "normalized",
            Self::Persisted => "persisted",
        }
    }
}

impl fmt::Display for DatasetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named table together with where it came from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: DatasetName,
    /// Path of the backing file.
    pub source: PathBuf,
    /// Encoding the file was decoded with.
    pub encoding: String,
    pub table: DataFrame,
    pub state: DatasetState,
}

impl Dataset {
    pub fn loaded(
        name: DatasetName,
        source: impl Into<PathBuf>,
        encoding: impl Into<String>,
        table: DataFrame,
    ) -> Self {
        Self {
            name,
            source: source.into(),
            encoding: encoding.into(),
            table,
            state: DatasetState::Loaded,
        }
    }

    pub fn record_count(&self) -> usize {
        self.table.height()
    }

    pub fn column_count(&self) -> usize {
        self.table.width()
    }

    /// True once the dataset has been normalized (persisting keeps it normalized).
    pub fn is_normalized(&self) -> bool {
        self.state >= DatasetState::Normalized
    }
}

/// Type tag of a column; decides how missing cells are imputed and stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    /// Infer the kind from a column's values.
    ///
    /// A column without a single non-null value carries no numeric evidence
    /// and is classified as text.
    pub fn of(column: &Column) -> Self {
        if column.null_count() == column.len() {
            return Self::Text;
        }
        if column.dtype().is_primitive_numeric() {
            Self::Numeric
        } else {
            Self::Text
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_kind_follows_values() {
        let ints = Column::new("qty".into(), [Some(1i64), None, Some(3)]);
        let floats = Column::new("amount".into(), [Some(1.5f64), None]);
        let text = Column::new("status".into(), [Some("Shipped"), None]);
        let empty = Column::new("note".into(), [None::<f64>, None]);

        assert_eq!(ColumnKind::of(&ints), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of(&floats), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of(&text), ColumnKind::Text);
        assert_eq!(ColumnKind::of(&empty), ColumnKind::Text);
    }

    #[test]
    fn state_ordering_tracks_progress() {
        assert!(DatasetState::Persisted > DatasetState::Normalized);
        assert!(DatasetState::Normalized > DatasetState::Loaded);
    }
}
