//! Run configuration loaded from a TOML file.
//!
//! Precedence, lowest first: built-in defaults, the config file, the
//! environment, command-line flags. Flags are applied by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use retail_ingest::{EncodingChain, MAX_CSV_FILE_SIZE, ReaderOptions};
use retail_model::DatasetCatalog;
use retail_persistence::StoreConfig;

use crate::pipeline::PipelineOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtlConfig {
    /// Directory holding the catalog's CSV files.
    pub data_dir: PathBuf,
    /// WHATWG encoding labels, tried in order.
    pub encodings: EncodingChain,
    /// Rows scanned for type inference; unset scans whole files.
    pub infer_schema_rows: Option<usize>,
    pub null_markers: Vec<String>,
    pub parallel_load: bool,
    pub max_file_bytes: u64,
    pub store: StoreConfig,
    pub datasets: DatasetCatalog,
}

impl Default for EtlConfig {
    fn default() -> Self {
        let reader = ReaderOptions::default();
        Self {
            data_dir: PathBuf::from("dataset"),
            encodings: reader.encodings,
            infer_schema_rows: reader.infer_schema_rows,
            null_markers: reader.null_markers,
            parallel_load: true,
            max_file_bytes: MAX_CSV_FILE_SIZE,
            store: StoreConfig::default(),
            datasets: DatasetCatalog::default(),
        }
    }
}

impl EtlConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse configuration")
    }

    /// Read `path` if given, otherwise start from defaults; then apply the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("read config {}", path.display()))?;
                Self::from_toml(&text).with_context(|| format!("in {}", path.display()))?
            }
            None => Self::default(),
        };
        config.store.apply_env();
        Ok(config)
    }

    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            encodings: self.encodings.clone(),
            infer_schema_rows: self.infer_schema_rows,
            null_markers: self.null_markers.clone(),
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            data_dir: self.data_dir.clone(),
            catalog: self.datasets.clone(),
            reader: self.reader_options(),
            parallel_load: self.parallel_load,
            max_file_bytes: self.max_file_bytes,
        }
    }
}
