//! Persisting datasets through a [`TableSink`].

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use retail_model::{DatasetName, DatasetState, Registry};

use crate::error::{PersistenceError, Result};
use crate::sink::TableSink;

/// Outcome of persisting a registry.
#[derive(Debug, Default)]
pub struct PersistReport {
    /// Datasets written, with the number of rows stored.
    pub stored: Vec<(DatasetName, usize)>,
    /// Datasets the sink rejected, each as `PersistenceFailed`.
    pub failures: Vec<(DatasetName, PersistenceError)>,
}

impl PersistReport {
    pub fn rows_stored(&self) -> usize {
        self.stored.iter().map(|(_, rows)| rows).sum()
    }
}

/// Replace the stored table `name` with `table`.
///
/// Whatever the sink reports is wrapped as `PersistenceFailed` for `name`.
pub fn persist<S: TableSink + ?Sized>(
    name: &DatasetName,
    table: &DataFrame,
    sink: &mut S,
) -> Result<usize> {
    sink.replace_table(name, table)
        .map_err(|cause| PersistenceError::for_dataset(name.as_str(), cause))
}

/// Persist every normalized dataset, continuing past failures.
///
/// Datasets that were written are marked `Persisted`.
pub fn persist_registry<S: TableSink + ?Sized>(
    registry: &mut Registry,
    sink: &mut S,
) -> PersistReport {
    let mut report = PersistReport::default();
    let store = sink.describe();
    for dataset in registry.iter_mut() {
        if !dataset.is_normalized() {
            continue;
        }
        let span = info_span!("persist", dataset = %dataset.name, %store);
        let _guard = span.enter();
        let start = Instant::now();
        match persist(&dataset.name, &dataset.table, sink) {
            Ok(rows) => {
                dataset.state = DatasetState::Persisted;
                info!(
                    rows,
                    duration_ms = start.elapsed().as_millis(),
                    "persisted dataset"
                );
                report.stored.push((dataset.name.clone(), rows));
            }
            Err(error) => {
                warn!(%error, "persist failed");
                report.failures.push((dataset.name.clone(), error));
            }
        }
    }
    report
}
