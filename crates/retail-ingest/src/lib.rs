//! Retail data ingestion.
//!
//! Reads the configured CSV sources into Polars DataFrames.
//!
//! # Features
//!
//! - **Encoding recovery**: try an ordered list of encodings, first clean decode wins
//! - **Byte sources**: filesystem access behind a trait, with a size limit
//! - **Catalog loading**: load every configured dataset, optionally in parallel,
//!   and fill the registry with the ones that succeeded
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use retail_ingest::{CsvReader, FileSystemSource, ReaderOptions, load_catalog, populate_registry};
//! use retail_model::{DatasetCatalog, Registry};
//!
//! let reader = CsvReader::new(FileSystemSource::default(), ReaderOptions::default());
//! let loads = load_catalog(Path::new("dataset"), &DatasetCatalog::default(), &reader, true);
//! let mut registry = Registry::new();
//! let failures = populate_registry(loads, &mut registry);
//! ```

mod encoding;
mod error;
mod loader;
mod reader;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === Encodings ===
pub use encoding::{DEFAULT_ENCODING_LABELS, EncodingChain, decode_strict};

// === Reading ===
pub use reader::{CsvReader, DEFAULT_NULL_MARKERS, LoadedTable, ReaderOptions, parse_csv_text};
pub use source::{ByteSource, FileSystemSource, MAX_CSV_FILE_SIZE, check_file_size_with_limit};

// === Catalog Loading ===
pub use loader::{DatasetLoad, LoadFailure, load_catalog, populate_registry};
