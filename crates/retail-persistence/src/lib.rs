//! Persistence of normalized retail datasets.
//!
//! Each dataset is written as one table named after the dataset. Writes use
//! replace semantics: the previous table of that name, schema and rows, is
//! dropped first.
//!
//! # Features
//!
//! - **SQL stores**: MySQL, PostgreSQL and SQLite through one sqlx `AnyPool`
//! - **Up-front connection check**: an unreachable store fails before any write
//! - **Per-dataset failures**: one rejected table never stops the others
//! - **In-memory sink** with the same semantics, for tests and embedding
//!
//! # Example
//!
//! ```ignore
//! use retail_persistence::{SqlSink, StoreConfig, persist_registry};
//!
//! let mut sink = SqlSink::connect(&StoreConfig::sqlite("analytics.db"))?;
//! let report = persist_registry(&mut registry, &mut sink);
//! ```
//!
//! Column types are fixed: numeric columns become `DOUBLE PRECISION`,
//! everything else `TEXT`. Integers a double cannot hold exactly fail the
//! dataset rather than being rounded.

mod config;
mod dialect;
mod error;
mod persist;
mod sink;
mod sql;
mod values;

pub use config::{PASSWORD_ENV, StoreConfig, StoreDriver, redact_url};
pub use dialect::MAX_BIND_PARAMS;
pub use error::{PersistenceError, Result};
pub use persist::{PersistReport, persist, persist_registry};
pub use sink::{MemorySink, StoredTable, TableSink};
pub use sql::SqlSink;
pub use values::{MAX_EXACT_INTEGER, StoredColumn, StoredValues, stored_columns};
