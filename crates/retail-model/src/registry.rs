//! Working set of the pipeline.
//!
//! The registry is owned by the pipeline driver and handed to each stage by
//! reference. Datasets keep their insertion order so reports are
//! deterministic.

use crate::{Dataset, DatasetName, ModelError};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    datasets: Vec<Dataset>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finished dataset. Each name can be written once.
    pub fn insert(&mut self, dataset: Dataset) -> Result<(), ModelError> {
        if self.contains(dataset.name.as_str()) {
            return Err(ModelError::DuplicateDataset(dataset.name.to_string()));
        }
        self.datasets.push(dataset);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|dataset| dataset.name.as_str() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Dataset> {
        self.datasets
            .iter_mut()
            .find(|dataset| dataset.name.as_str() == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dataset> {
        self.datasets.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Dataset> {
        self.datasets.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn names(&self) -> Vec<&DatasetName> {
        self.datasets.iter().map(|dataset| &dataset.name).collect()
    }

    pub fn into_datasets(self) -> Vec<Dataset> {
        self.datasets
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Dataset;
    type IntoIter = std::slice::Iter<'a, Dataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}

impl<'a> IntoIterator for &'a mut Registry {
    type Item = &'a mut Dataset;
    type IntoIter = std::slice::IterMut<'a, Dataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter_mut()
    }
}
