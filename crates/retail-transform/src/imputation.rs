//! Type-aware filling of missing cells.

use polars::prelude::{Column, DataType, FillNullStrategy, IntoColumn, StringChunked};

use retail_model::ColumnKind;

use crate::error::{Result, TransformError};

/// Value written into missing cells of text columns.
pub const TEXT_PLACEHOLDER: &str = "Unknown";

/// What imputation did to one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFill {
    pub column: String,
    pub kind: ColumnKind,
    pub filled: usize,
}

/// Fill the missing cells of `column` according to its inferred kind.
///
/// Numeric columns get the zero of their own type; text columns (including
/// columns with no values at all) are materialized as strings and get
/// [`TEXT_PLACEHOLDER`]. Columns without gaps are returned untouched.
pub fn impute_column(column: &Column) -> Result<(Column, ColumnFill)> {
    let kind = ColumnKind::of(column);
    let missing = column.null_count();
    let name = column.name().clone();
    let fill = ColumnFill {
        column: name.to_string(),
        kind,
        filled: missing,
    };
    if missing == 0 {
        return Ok((column.clone(), fill));
    }

    let wrap = |source| TransformError::Column {
        column: name.to_string(),
        source,
    };
    let filled = match kind {
        ColumnKind::Numeric => column
            .as_materialized_series()
            .fill_null(FillNullStrategy::Zero)
            .map_err(wrap)?
            .into_column(),
        ColumnKind::Text => {
            let text = column.cast(&DataType::String).map_err(wrap)?;
            let values: StringChunked = text
                .str()
                .map_err(wrap)?
                .into_iter()
                .map(|value| Some(value.unwrap_or(TEXT_PLACEHOLDER)))
                .collect();
            values.with_name(name.clone()).into_column()
        }
    };
    Ok((filled, fill))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_gaps_become_zero() {
        let column = Column::new("qty".into(), [Some(3i64), None, Some(1)]);
        let (filled, fill) = impute_column(&column).unwrap();

        assert_eq!(fill.kind, ColumnKind::Numeric);
        assert_eq!(fill.filled, 1);
        assert_eq!(filled.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = filled.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(3), Some(0), Some(1)]);
    }

    #[test]
    fn test_float_gaps_become_zero() {
        let column = Column::new("amount".into(), [None, Some(647.62f64)]);
        let (filled, _) = impute_column(&column).unwrap();

        let values: Vec<Option<f64>> = filled.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(0.0), Some(647.62)]);
    }

    #[test]
    fn test_text_gaps_become_placeholder() {
        let column = Column::new("courier_status".into(), [Some("Shipped"), None]);
        let (filled, fill) = impute_column(&column).unwrap();

        assert_eq!(fill.kind, ColumnKind::Text);
        assert_eq!(filled.name().as_str(), "courier_status");
        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("Shipped"), Some("Unknown")]);
    }

    #[test]
    fn test_all_missing_column_is_text() {
        let column = Column::new("fulfilled_by".into(), [None::<f64>, None]);
        let (filled, fill) = impute_column(&column).unwrap();

        assert_eq!(fill.kind, ColumnKind::Text);
        assert_eq!(fill.filled, 2);
        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("Unknown"), Some("Unknown")]);
    }

    #[test]
    fn test_complete_column_is_untouched() {
        let column = Column::new("sku".into(), ["A", "B"]);
        let (filled, fill) = impute_column(&column).unwrap();

        assert_eq!(fill.filled, 0);
        assert!(filled.as_materialized_series().equals(column.as_materialized_series()));
    }
}
