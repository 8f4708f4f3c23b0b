//! Pipeline driver: Load, Normalize, optionally Persist, then Report.
//!
//! The driver owns the [`Registry`] and hands it to each stage. Failures are
//! scoped to one dataset and collected; nothing in a run is fatal. Calling
//! a stage out of order logs a warning and operates on whatever the registry
//! holds at that point.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, info_span, warn};

use retail_ingest::{
    ByteSource, CsvReader, FileSystemSource, ReaderOptions, load_catalog, populate_registry,
};
use retail_model::{DatasetCatalog, DatasetName, Registry};
use retail_persistence::{PersistenceError, TableSink, persist_registry};
use retail_report::{Report, summarize};
use retail_transform::normalize_registry;

/// Coarse progress of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    Empty,
    Loaded,
    Normalized,
    Persisted,
    Reported,
}

impl PipelineStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Loaded => "load",
            Self::Normalized => "normalize",
            Self::Persisted => "persist",
            Self::Reported => "report",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A dataset (or, with no dataset, the whole stage) that did not get through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFailure {
    pub dataset: Option<DatasetName>,
    pub stage: PipelineStage,
    pub reason: String,
}

/// Everything the driver needs to know to load the catalog.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub data_dir: PathBuf,
    pub catalog: DatasetCatalog,
    pub reader: ReaderOptions,
    pub parallel_load: bool,
    pub max_file_bytes: u64,
}

#[derive(Debug)]
pub struct Pipeline {
    options: PipelineOptions,
    registry: Registry,
    stage: PipelineStage,
    failures: Vec<DatasetFailure>,
}

/// Render an error with all of its sources, outermost first.
pub fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            registry: Registry::new(),
            stage: PipelineStage::Empty,
            failures: Vec::new(),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn failures(&self) -> &[DatasetFailure] {
        &self.failures
    }

    /// Hand the registry to a downstream consumer.
    pub fn into_registry(self) -> Registry {
        self.registry
    }

    /// Load every catalog entry from the filesystem.
    pub fn load(&mut self) -> usize {
        let source = FileSystemSource::new(self.options.max_file_bytes);
        self.load_from(source)
    }

    /// Load every catalog entry through `source`. Returns how many loaded.
    pub fn load_from<S: ByteSource>(&mut self, source: S) -> usize {
        if self.stage != PipelineStage::Empty {
            warn!(stage = %self.stage, "load requested again; loaded datasets are kept");
        }
        let span = info_span!("stage", stage = "load", dir = %self.options.data_dir.display());
        let _guard = span.enter();
        let start = Instant::now();

        let reader = CsvReader::new(source, self.options.reader.clone());
        let loads = load_catalog(
            &self.options.data_dir,
            &self.options.catalog,
            &reader,
            self.options.parallel_load,
        );
        let before = self.registry.len();
        for failure in populate_registry(loads, &mut self.registry) {
            self.record(Some(failure.name), PipelineStage::Loaded, &failure.error);
        }
        let loaded = self.registry.len() - before;

        info!(
            loaded,
            requested = self.options.catalog.len(),
            duration_ms = start.elapsed().as_millis(),
            "load stage finished"
        );
        self.advance(PipelineStage::Loaded);
        loaded
    }

    /// Normalize every loaded dataset. Returns how many were normalized.
    pub fn normalize(&mut self) -> usize {
        if self.stage < PipelineStage::Loaded {
            warn!("normalize requested before load; registry is empty");
        }
        let span = info_span!("stage", stage = "normalize");
        let _guard = span.enter();
        let start = Instant::now();

        let pending = self
            .registry
            .iter()
            .filter(|dataset| !dataset.is_normalized())
            .count();
        let failures = normalize_registry(&mut self.registry);
        let normalized = pending - failures.len();
        for (name, error) in failures {
            self.record(Some(name), PipelineStage::Normalized, &error);
        }

        info!(
            normalized,
            duration_ms = start.elapsed().as_millis(),
            "normalize stage finished"
        );
        self.advance(PipelineStage::Normalized);
        normalized
    }

    /// Persist every normalized dataset into `sink`. Returns how many were written.
    pub fn persist<S: TableSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        if self.stage < PipelineStage::Normalized {
            warn!(stage = %self.stage, "persist requested before normalize");
        }
        let span = info_span!("stage", stage = "persist");
        let _guard = span.enter();
        let start = Instant::now();

        let report = persist_registry(&mut self.registry, sink);
        for (name, error) in &report.failures {
            self.record(Some(name.clone()), PipelineStage::Persisted, error);
        }

        info!(
            stored = report.stored.len(),
            failed = report.failures.len(),
            rows = report.rows_stored(),
            duration_ms = start.elapsed().as_millis(),
            "persist stage finished"
        );
        self.advance(PipelineStage::Persisted);
        report.stored.len()
    }

    /// Connect with `connect` and persist. A failed connection skips the
    /// stage entirely and is recorded once, without a dataset.
    pub fn persist_with<S, F>(&mut self, connect: F) -> usize
    where
        S: TableSink,
        F: FnOnce() -> Result<S, PersistenceError>,
    {
        match connect() {
            Ok(mut sink) => self.persist(&mut sink),
            Err(error) => {
                if error.is_connection_unavailable() {
                    warn!(%error, "store unavailable; skipping persist stage");
                } else {
                    warn!(%error, "store not configured correctly; skipping persist stage");
                }
                self.record(None, PipelineStage::Persisted, &error);
                0
            }
        }
    }

    /// Summarize the datasets that reached normalization.
    pub fn report(&mut self) -> Report {
        if self.stage < PipelineStage::Normalized {
            warn!(stage = %self.stage, "report requested before normalize");
        }
        let report = summarize(&self.registry);
        info!(
            datasets = report.datasets.len(),
            total_records = report.total_records,
            "report ready"
        );
        self.stage = PipelineStage::Reported;
        report
    }

    /// True when at least one dataset reached normalization.
    pub fn succeeded(&self) -> bool {
        self.registry.iter().any(|dataset| dataset.is_normalized())
    }

    fn advance(&mut self, stage: PipelineStage) {
        if stage > self.stage {
            self.stage = stage;
        }
    }

    fn record(&mut self, dataset: Option<DatasetName>, stage: PipelineStage, error: &dyn Error) {
        self.failures.push(DatasetFailure {
            dataset,
            stage,
            reason: error_chain(error),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_joins_sources() {
        let cause = PersistenceError::UnsupportedColumn {
            column: "tags".to_string(),
            dtype: "list[str]".to_string(),
        };
        let error = PersistenceError::for_dataset("amazon_sales", cause);

        assert_eq!(
            error_chain(&error),
            "failed to persist dataset 'amazon_sales': column 'tags' of type list[str] cannot be stored"
        );
    }

    #[test]
    fn test_stages_are_ordered() {
        assert!(PipelineStage::Empty < PipelineStage::Loaded);
        assert!(PipelineStage::Normalized < PipelineStage::Persisted);
        assert!(PipelineStage::Persisted < PipelineStage::Reported);
    }
}
