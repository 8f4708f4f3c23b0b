use std::fmt;

use serde::Serialize;

use retail_model::{Dataset, DatasetState, Registry};

/// Number of column names shown per dataset.
pub const PREVIEW_COLUMNS: usize = 5;

/// The first few column names of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnPreview {
    names: Vec<String>,
    truncated: bool,
}

impl ColumnPreview {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = names.into_iter();
        let preview: Vec<String> = names.by_ref().take(PREVIEW_COLUMNS).map(Into::into).collect();
        let truncated = names.next().is_some();
        Self {
            names: preview,
            truncated,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True when the table has more columns than the preview shows.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Display for ColumnPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(", "))?;
        if self.truncated {
            f.write_str("...")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    /// Upper-case title, e.g. `AMAZON SALES`.
    pub title: String,
    pub records: usize,
    pub columns: usize,
    pub preview: ColumnPreview,
    pub encoding: String,
    pub persisted: bool,
}

impl DatasetSummary {
    pub fn of(dataset: &Dataset) -> Self {
        let names = dataset.table.get_column_names();
        Self {
            name: dataset.name.to_string(),
            title: dataset.name.display_title(),
            records: dataset.record_count(),
            columns: dataset.column_count(),
            preview: ColumnPreview::new(names.iter().map(|name| name.as_str())),
            encoding: dataset.encoding.clone(),
            persisted: dataset.state == DatasetState::Persisted,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub datasets: Vec<DatasetSummary>,
    pub total_records: usize,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn persisted_count(&self) -> usize {
        self.datasets.iter().filter(|summary| summary.persisted).count()
    }
}

/// Summarize every dataset that reached normalization, in registry order.
///
/// Read-only and infallible; an empty registry gives an empty report.
pub fn summarize(registry: &Registry) -> Report {
    let datasets: Vec<DatasetSummary> = registry
        .iter()
        .filter(|dataset| dataset.is_normalized())
        .map(DatasetSummary::of)
        .collect();
    let total_records = datasets.iter().map(|summary| summary.records).sum();
    Report {
        datasets,
        total_records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_without_truncation() {
        let preview = ColumnPreview::new(["sku", "stock"]);
        assert!(!preview.is_truncated());
        assert_eq!(preview.to_string(), "sku, stock");
    }

    #[test]
    fn test_preview_exactly_five() {
        let preview = ColumnPreview::new(["a", "b", "c", "d", "e"]);
        assert!(!preview.is_truncated());
        assert_eq!(preview.to_string(), "a, b, c, d, e");
    }

    #[test]
    fn test_preview_truncates_after_five() {
        let preview = ColumnPreview::new(["a", "b", "c", "d", "e", "f", "g"]);
        assert!(preview.is_truncated());
        assert_eq!(preview.names().len(), 5);
        assert_eq!(preview.to_string(), "a, b, c, d, e...");
    }

    #[test]
    fn test_empty_preview() {
        let preview = ColumnPreview::new(Vec::<String>::new());
        assert_eq!(preview.to_string(), "");
    }
}
