//! Loading every dataset of a catalog.
//!
//! Loads are independent, so each dataset may run on its own scoped thread.
//! Workers only build their own table; the registry is filled afterwards,
//! one finished dataset at a time, in catalog order.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, info_span, warn};

use retail_model::{Dataset, DatasetCatalog, DatasetName, Registry};

use crate::error::{IngestError, Result};
use crate::reader::{CsvReader, LoadedTable};
use crate::source::ByteSource;

/// Outcome of loading one catalog entry.
#[derive(Debug)]
pub struct DatasetLoad {
    pub name: DatasetName,
    pub path: PathBuf,
    pub result: Result<LoadedTable>,
}

/// A dataset that did not make it into the registry.
#[derive(Debug)]
pub struct LoadFailure {
    pub name: DatasetName,
    pub error: IngestError,
}

/// Load each catalog entry from `dir`, returning results in catalog order.
pub fn load_catalog<S: ByteSource>(
    dir: &Path,
    catalog: &DatasetCatalog,
    reader: &CsvReader<S>,
    parallel: bool,
) -> Vec<DatasetLoad> {
    let jobs: Vec<(DatasetName, PathBuf)> = catalog
        .iter()
        .map(|entry| (entry.name.clone(), dir.join(&entry.file)))
        .collect();

    if !parallel || jobs.len() < 2 {
        return jobs
            .into_iter()
            .map(|(name, path)| {
                let result = load_one(reader, &name, &path);
                DatasetLoad { name, path, result }
            })
            .collect();
    }

    std::thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .iter()
            .map(|(name, path)| {
                let (name, path) = (name.clone(), path.clone());
                scope.spawn(move || load_one(reader, &name, &path))
            })
            .collect();
        jobs.into_iter()
            .zip(handles)
            .map(|((name, path), handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(IngestError::LoadPanicked { path: path.clone() })
                });
                DatasetLoad { name, path, result }
            })
            .collect()
    })
}

fn load_one<S: ByteSource>(
    reader: &CsvReader<S>,
    name: &DatasetName,
    path: &Path,
) -> Result<LoadedTable> {
    let span = info_span!("load", dataset = %name, file = %path.display());
    let _guard = span.enter();
    let start = Instant::now();
    let loaded = reader.load(path)?;
    info!(
        rows = loaded.table.height(),
        columns = loaded.table.width(),
        encoding = loaded.encoding.name(),
        duration_ms = start.elapsed().as_millis(),
        "loaded dataset"
    );
    Ok(loaded)
}

/// Move successful loads into `registry`; everything else becomes a failure.
pub fn populate_registry(loads: Vec<DatasetLoad>, registry: &mut Registry) -> Vec<LoadFailure> {
    let mut failures = Vec::new();
    for DatasetLoad { name, path, result } in loads {
        let loaded = match result {
            Ok(loaded) => loaded,
            Err(error) => {
                warn!(dataset = %name, %error, "skipping dataset");
                failures.push(LoadFailure { name, error });
                continue;
            }
        };
        let dataset = Dataset::loaded(name.clone(), path, loaded.encoding.name(), loaded.table);
        if let Err(error) = registry.insert(dataset) {
            warn!(dataset = %name, %error, "skipping dataset");
            failures.push(LoadFailure {
                name,
                error: error.into(),
            });
        }
    }
    failures
}
