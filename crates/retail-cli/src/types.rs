use std::path::PathBuf;

use retail_cli::pipeline::DatasetFailure;
use retail_report::Report;

#[derive(Debug)]
pub struct RunOutcome {
    pub data_dir: PathBuf,
    /// Redacted store URL when persisting was requested.
    pub store: Option<String>,
    pub report: Report,
    pub failures: Vec<DatasetFailure>,
    /// At least one dataset reached normalization.
    pub succeeded: bool,
}
