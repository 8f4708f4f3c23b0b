//! Materializing a table into storable columns.
//!
//! Every column is stored either as a nullable double or as nullable text,
//! decided by its [`ColumnKind`]. Integers beyond 2^53 would be rounded by
//! that mapping and are rejected instead.

use polars::prelude::{Column, DataFrame, DataType};

use retail_model::ColumnKind;

use crate::error::{PersistenceError, Result};

/// Integers up to this magnitude are exact as doubles.
pub const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Values of one column, in row order.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl StoredValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Text(_) => ColumnKind::Text,
        }
    }
}

/// A named column ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredColumn {
    pub name: String,
    pub values: StoredValues,
}

/// Convert every column of `table`, failing on types with no storable form.
pub fn stored_columns(table: &DataFrame) -> Result<Vec<StoredColumn>> {
    table.get_columns().iter().map(stored_column).collect()
}

fn stored_column(column: &Column) -> Result<StoredColumn> {
    let name = column.name().to_string();
    let dtype = column.dtype();
    if dtype.is_nested() || matches!(dtype, DataType::Binary | DataType::BinaryOffset) {
        return Err(PersistenceError::UnsupportedColumn {
            column: name,
            dtype: dtype.to_string(),
        });
    }
    let wrap = |source| PersistenceError::Column {
        column: column.name().to_string(),
        source,
    };

    let values = match ColumnKind::of(column) {
        ColumnKind::Numeric => {
            check_exact_integers(column)?;
            let cast = column.cast(&DataType::Float64).map_err(wrap)?;
            StoredValues::Numeric(cast.f64().map_err(wrap)?.into_iter().collect())
        }
        ColumnKind::Text => {
            let cast = column.cast(&DataType::String).map_err(wrap)?;
            let values = cast
                .str()
                .map_err(wrap)?
                .into_iter()
                .map(|value| value.map(str::to_string))
                .collect();
            StoredValues::Text(values)
        }
    };
    Ok(StoredColumn { name, values })
}

fn check_exact_integers(column: &Column) -> Result<()> {
    let wrap = |source| PersistenceError::Column {
        column: column.name().to_string(),
        source,
    };
    let lossy = |value: String| PersistenceError::LossyNumeric {
        column: column.name().to_string(),
        value,
    };
    let dtype = column.dtype();
    if dtype.is_signed_integer() {
        let cast = column.cast(&DataType::Int64).map_err(wrap)?;
        let too_large = cast
            .i64()
            .map_err(wrap)?
            .into_iter()
            .flatten()
            .find(|value| value.unsigned_abs() > MAX_EXACT_INTEGER);
        if let Some(value) = too_large {
            return Err(lossy(value.to_string()));
        }
    } else if dtype.is_unsigned_integer() {
        let cast = column.cast(&DataType::UInt64).map_err(wrap)?;
        let too_large = cast
            .u64()
            .map_err(wrap)?
            .into_iter()
            .flatten()
            .find(|value| *value > MAX_EXACT_INTEGER);
        if let Some(value) = too_large {
            return Err(lossy(value.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_stored_as_doubles() {
        let table = DataFrame::new(vec![
            Column::new("qty".into(), [1i64, 2]),
            Column::new("sku".into(), ["A", "B"]),
        ])
        .unwrap();

        let columns = stored_columns(&table).unwrap();

        assert_eq!(columns[0].values, StoredValues::Numeric(vec![Some(1.0), Some(2.0)]));
        assert_eq!(
            columns[1].values,
            StoredValues::Text(vec![Some("A".to_string()), Some("B".to_string())])
        );
    }

    #[test]
    fn test_booleans_are_stored_as_text() {
        let table = DataFrame::new(vec![Column::new("b2b".into(), [true, false])]).unwrap();

        let columns = stored_columns(&table).unwrap();

        assert_eq!(columns[0].values.kind(), ColumnKind::Text);
        assert_eq!(
            columns[0].values,
            StoredValues::Text(vec![Some("true".to_string()), Some("false".to_string())])
        );
    }

    #[test]
    fn test_integers_beyond_exact_range_are_rejected() {
        let table = DataFrame::new(vec![Column::new(
            "order_id".into(),
            [Some(1i64), None, Some(-9_007_199_254_740_993)],
        )])
        .unwrap();

        let err = stored_columns(&table).unwrap_err();

        assert!(matches!(
            err,
            PersistenceError::LossyNumeric { ref column, ref value }
                if column == "order_id" && value == "-9007199254740993"
        ));
    }

    #[test]
    fn test_exact_range_boundary_is_stored() {
        let table = DataFrame::new(vec![
            Column::new("signed".into(), [9_007_199_254_740_992i64]),
            Column::new("unsigned".into(), [9_007_199_254_740_992u64]),
        ])
        .unwrap();

        let columns = stored_columns(&table).unwrap();

        assert_eq!(
            columns[0].values,
            StoredValues::Numeric(vec![Some(9_007_199_254_740_992.0)])
        );
        assert_eq!(columns[1].values.kind(), ColumnKind::Numeric);
    }
}
