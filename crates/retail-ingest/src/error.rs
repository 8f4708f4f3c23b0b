//! Error types for data ingestion.

use std::path::PathBuf;
use thiserror::Error;

use retail_model::ModelError;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// The backing file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("{path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Decoding Errors ===
    /// None of the configured encodings could decode the file.
    #[error("no configured encoding could decode {path} (tried {})", .tried.join(", "))]
    UndecodableFile { path: PathBuf, tried: Vec<String> },

    /// Encoding label not recognized.
    #[error("unknown encoding label '{label}'")]
    UnknownEncoding { label: String },

    /// Encoding chain without any candidate.
    #[error("at least one encoding must be configured")]
    NoEncodings,

    // === Parsing Errors ===
    /// Text decoded fine but is not a well-formed delimited table.
    #[error("malformed table in {path} (decoded as {encoding}): {message}")]
    MalformedTable {
        path: PathBuf,
        encoding: String,
        message: String,
    },

    // === Loader Errors ===
    /// The worker loading this file panicked.
    #[error("loader for {path} panicked")]
    LoadPanicked { path: PathBuf },

    #[error(transparent)]
    Registry(#[from] ModelError),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
