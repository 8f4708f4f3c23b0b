use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid dataset name '{0}': expected lower-case letters, digits and '_', starting with a letter")]
    InvalidDatasetName(String),
    #[error("dataset '{0}' is already registered")]
    DuplicateDataset(String),
    #[error("dataset '{0}' appears more than once in the catalog")]
    DuplicateCatalogEntry(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
