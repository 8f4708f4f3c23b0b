#![deny(unsafe_code)]

use std::fmt;

use crate::ModelError;

/// Logical name of a dataset.
///
/// Names double as table names in the store, so they are restricted to
/// `[a-z][a-z0-9_]*`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetName(pub(crate) String);

impl DatasetName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        let valid_start = chars.next().is_some_and(|ch| ch.is_ascii_lowercase());
        let valid_rest =
            chars.all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');
        if !valid_start || !valid_rest {
            return Err(ModelError::InvalidDatasetName(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Heading used in the summary, e.g. `amazon_sales` -> `AMAZON SALES`.
    pub fn display_title(&self) -> String {
        self.0.to_uppercase().replace('_', " ")
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DatasetName {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DatasetName> for String {
    fn from(value: DatasetName) -> Self {
        value.0
    }
}

impl AsRef<str> for DatasetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_snake_case_names() {
        let name = DatasetName::new(" pl_march_2021 ").unwrap();
        assert_eq!(name.as_str(), "pl_march_2021");
        assert_eq!(name.display_title(), "PL MARCH 2021");
    }

    #[test]
    fn rejects_names_unusable_as_tables() {
        for raw in ["", "Amazon", "2022_sales", "sales report", "sales-report"] {
            assert_eq!(
                DatasetName::new(raw),
                Err(ModelError::InvalidDatasetName(raw.to_string()))
            );
        }
    }
}
