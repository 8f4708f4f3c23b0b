//! Table normalization: canonical names plus null imputation.

use polars::prelude::{DataFrame, PlSmallStr};
use tracing::{debug, info, info_span, warn};

use retail_model::{ColumnKind, Dataset, DatasetName, DatasetState, Registry};

use crate::columns::{NameCollision, canonicalize_names};
use crate::error::{Result, TransformError};
use crate::imputation::{ColumnFill, impute_column};

/// What normalization changed in one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// `(original, canonical)` for every column whose name changed.
    pub renamed: Vec<(String, String)>,
    pub collisions: Vec<NameCollision>,
    /// One entry per column, in column order, under the new name.
    pub columns: Vec<ColumnFill>,
}

impl NormalizationReport {
    /// Total number of cells that were missing and got a value.
    pub fn cells_filled(&self) -> usize {
        self.columns.iter().map(|fill| fill.filled).sum()
    }

    pub fn numeric_columns(&self) -> usize {
        self.columns
            .iter()
            .filter(|fill| fill.kind == ColumnKind::Numeric)
            .count()
    }
}

/// Canonicalize column names and fill missing cells in place.
///
/// Column count, row count and column order are preserved. Tables without
/// rows only get their names canonicalized. Running this twice is a no-op
/// the second time.
pub fn normalize_table(table: &mut DataFrame) -> Result<NormalizationReport> {
    let mut report = NormalizationReport::default();
    if table.width() == 0 {
        return Ok(report);
    }

    let names = canonicalize_names(table.get_column_names().iter().map(|name| name.as_str()));
    report.collisions = names.collisions;
    let impute = table.height() > 0;

    let mut columns = Vec::with_capacity(table.width());
    for (column, name) in table.get_columns().iter().zip(&names.names) {
        let (column, mut fill) = if impute {
            impute_column(column)?
        } else {
            let fill = ColumnFill {
                column: column.name().to_string(),
                kind: ColumnKind::of(column),
                filled: 0,
            };
            (column.clone(), fill)
        };
        if column.name().as_str() != name {
            report.renamed.push((column.name().to_string(), name.clone()));
        }
        fill.column.clone_from(name);
        report.columns.push(fill);
        columns.push(column.with_name(PlSmallStr::from_str(name)));
    }

    *table = DataFrame::new(columns).map_err(TransformError::Frame)?;
    Ok(report)
}

/// Normalize one dataset and mark it `Normalized`.
///
/// On error the dataset keeps its previous state and table.
pub fn normalize_dataset(dataset: &mut Dataset) -> Result<NormalizationReport> {
    let span = info_span!("normalize", dataset = %dataset.name);
    let _guard = span.enter();

    let report = normalize_table(&mut dataset.table)?;
    for collision in &report.collisions {
        warn!(
            original = %collision.original,
            canonical = %collision.canonical,
            assigned = %collision.assigned,
            "column name collision"
        );
    }
    for (original, canonical) in &report.renamed {
        debug!(%original, %canonical, "renamed column");
    }
    if dataset.state < DatasetState::Normalized {
        dataset.state = DatasetState::Normalized;
    }
    info!(
        columns = report.columns.len(),
        numeric = report.numeric_columns(),
        renamed = report.renamed.len(),
        filled = report.cells_filled(),
        "normalized dataset"
    );
    Ok(report)
}

/// Normalize every dataset still in the `Loaded` state.
///
/// Returns the datasets that could not be normalized; they stay `Loaded`.
pub fn normalize_registry(registry: &mut Registry) -> Vec<(DatasetName, TransformError)> {
    let mut failures = Vec::new();
    for dataset in registry.iter_mut() {
        if dataset.state != DatasetState::Loaded {
            continue;
        }
        if let Err(error) = normalize_dataset(dataset) {
            warn!(dataset = %dataset.name, %error, "normalization failed");
            failures.push((dataset.name.clone(), error));
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use polars::prelude::Column;

    use super::*;

    #[test]
    fn test_rename_and_fill() {
        let mut table = DataFrame::new(vec![
            Column::new("Order ID".into(), ["405-1", "405-2"]),
            Column::new(" Qty ".into(), [Some(2i64), None]),
            Column::new("Courier Status".into(), [None, Some("Shipped")]),
        ])
        .unwrap();

        let report = normalize_table(&mut table).unwrap();

        let names: Vec<&str> = table
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["order_id", "qty", "courier_status"]);
        assert_eq!(report.renamed.len(), 3);
        assert_eq!(report.cells_filled(), 2);
        assert_eq!(report.columns[1].column, "qty");
        assert_eq!(report.columns[1].kind, ColumnKind::Numeric);

        let qty = table.column("qty").unwrap().i64().unwrap();
        let qty: Vec<Option<i64>> = qty.into_iter().collect();
        assert_eq!(qty, vec![Some(2), Some(0)]);
        let status = table.column("courier_status").unwrap();
        assert_eq!(status.str().unwrap().get(0), Some("Unknown"));
    }

    #[test]
    fn test_zero_row_table_only_renamed() {
        let mut table = DataFrame::new(vec![
            Column::new("Gross Amt".into(), Vec::<f64>::new()),
            Column::new("SKU".into(), Vec::<String>::new()),
        ])
        .unwrap();

        let report = normalize_table(&mut table).unwrap();

        assert_eq!(table.shape(), (0, 2));
        assert_eq!(table.column("gross_amt").unwrap().len(), 0);
        assert_eq!(report.cells_filled(), 0);
    }

    #[test]
    fn test_dataset_state_advances() {
        let name = DatasetName::new("sales_report").unwrap();
        let table = DataFrame::new(vec![Column::new("SKU Code".into(), ["A1"])]).unwrap();
        let mut dataset = Dataset::loaded(name, "Sale Report.csv", "UTF-8", table);

        normalize_dataset(&mut dataset).unwrap();

        assert_eq!(dataset.state, DatasetState::Normalized);
        assert!(dataset.table.column("sku_code").is_ok());
    }

    #[test]
    fn test_registry_skips_already_normalized() {
        let mut registry = Registry::new();
        let table = DataFrame::new(vec![Column::new("A".into(), [1i64])]).unwrap();
        let done_name = DatasetName::new("done").unwrap();
        let mut done = Dataset::loaded(done_name, "d.csv", "UTF-8", table.clone());
        done.state = DatasetState::Persisted;
        registry.insert(done).unwrap();
        let fresh_name = DatasetName::new("fresh").unwrap();
        registry
            .insert(Dataset::loaded(fresh_name, "f.csv", "UTF-8", table))
            .unwrap();

        let failures = normalize_registry(&mut registry);

        assert!(failures.is_empty());
        assert_eq!(registry.get("done").unwrap().state, DatasetState::Persisted);
        assert!(registry.get("done").unwrap().table.column("A").is_ok());
        assert_eq!(registry.get("fresh").unwrap().state, DatasetState::Normalized);
        assert!(registry.get("fresh").unwrap().table.column("a").is_ok());
    }
}
