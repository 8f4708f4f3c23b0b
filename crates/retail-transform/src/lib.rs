//! Normalization of loaded retail tables.
//!
//! Two passes over each table, done together:
//!
//! - **Column names**: trimmed, internal whitespace collapsed to `_`,
//!   lower-cased; collisions resolved by deterministic suffixing
//! - **Missing cells**: numeric columns get `0`, everything else becomes text
//!   and gets `"Unknown"`
//!
//! Normalization is idempotent and never changes the shape of a table.

mod columns;
mod error;
mod imputation;
mod normalize;

pub use columns::{CanonicalNames, NameCollision, canonical_column_name, canonicalize_names};
pub use error::{Result, TransformError};
pub use imputation::{ColumnFill, TEXT_PLACEHOLDER, impute_column};
pub use normalize::{NormalizationReport, normalize_dataset, normalize_registry, normalize_table};
