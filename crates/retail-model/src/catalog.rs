//! The fixed set of source files the pipeline knows about.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{DatasetName, ModelError};

/// One configured dataset: its logical name and the file backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: DatasetName,
    pub file: String,
}

impl CatalogEntry {
    pub fn new(name: &str, file: impl Into<String>) -> Result<Self, ModelError> {
        Ok(Self {
            name: DatasetName::new(name)?,
            file: file.into(),
        })
    }
}

/// Ordered list of datasets. Order drives load and report order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")]
pub struct DatasetCatalog {
    entries: Vec<CatalogEntry>,
}

const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    ("amazon_sales", "Amazon Sale Report.csv"),
    ("cloud_warehouse", "Cloud Warehouse Compersion Chart.csv"),
    ("expenses", "Expense IIGF.csv"),
    ("international_sales", "International sale Report.csv"),
    ("may_2022_sales", "May-2022.csv"),
    ("pl_march_2021", "P  L March 2021.csv"),
    ("sales_report", "Sale Report.csv"),
];

impl DatasetCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, ModelError> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(ModelError::DuplicateCatalogEntry(entry.name.to_string()));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        let entries = DEFAULT_ENTRIES
            .iter()
            .map(|(name, file)| CatalogEntry {
                name: DatasetName(name.to_string()),
                file: (*file).to_string(),
            })
            .collect();
        Self { entries }
    }
}

impl TryFrom<Vec<CatalogEntry>> for DatasetCatalog {
    type Error = ModelError;

    fn try_from(entries: Vec<CatalogEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<DatasetCatalog> for Vec<CatalogEntry> {
    fn from(catalog: DatasetCatalog) -> Self {
        catalog.entries
    }
}

impl<'a> IntoIterator for &'a DatasetCatalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
