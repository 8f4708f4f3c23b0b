//! End-to-end runs of the stage driver over files in a temporary directory.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use retail_cli::config::EtlConfig;
use retail_cli::pipeline::{Pipeline, PipelineStage};
use retail_model::DatasetState;
use retail_persistence::{MemorySink, SqlSink, StoreConfig, StoredValues};

const AMAZON: &str = "\
Order ID,Status,Qty,Amount
171-001,Shipped,1,647.62
171-002,,2,
171-003,Cancelled,,399.00
";

// "Müller" and "Café" encoded as windows-1252; not valid UTF-8.
const SALES_LATIN1: &[u8] = b"SKU Code,Design No.,Stock\nJNE-1,M\xfcller,6\nJNE-2,Caf\xe9,3\n";

fn write(dir: &Path, name: &str, bytes: &[u8]) {
    fs::write(dir.join(name), bytes).unwrap();
}

fn config_for(dir: &Path) -> EtlConfig {
    EtlConfig::from_toml(&format!(
        r#"
        data_dir = '{}'
        parallel_load = false

        [[datasets]]
        name = "amazon_sales"
        file = "Amazon Sale Report.csv"

        [[datasets]]
        name = "sales_report"
        file = "Sale Report.csv"

        [[datasets]]
        name = "expenses"
        file = "Expense IIGF.csv"
        "#,
        dir.display()
    ))
    .unwrap()
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Amazon Sale Report.csv", AMAZON.as_bytes());
    write(dir.path(), "Sale Report.csv", SALES_LATIN1);
    dir
}

#[test]
fn full_run_skips_missing_file_and_stores_the_rest() {
    let dir = fixture();
    let mut pipeline = Pipeline::new(config_for(dir.path()).pipeline_options());

    assert_eq!(pipeline.load(), 2);
    assert_eq!(pipeline.normalize(), 2);
    let mut sink = MemorySink::new();
    assert_eq!(pipeline.persist(&mut sink), 2);
    let report = pipeline.report();

    assert_eq!(pipeline.stage(), PipelineStage::Reported);
    assert!(pipeline.succeeded());

    let failures = pipeline.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].dataset.as_ref().unwrap().as_str(), "expenses");
    assert_eq!(failures[0].stage, PipelineStage::Loaded);

    let names: Vec<&str> = report.datasets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["amazon_sales", "sales_report"]);
    assert_eq!(report.total_records, 5);
    assert_eq!(report.persisted_count(), 2);
    assert_eq!(report.datasets[1].encoding, "windows-1252");
    assert_eq!(report.datasets[1].title, "SALES REPORT");

    let amazon = sink.table("amazon_sales").unwrap();
    assert_eq!(
        amazon.column_names(),
        vec!["order_id", "status", "qty", "amount"]
    );
    match &amazon.column("status").unwrap().values {
        StoredValues::Text(values) => {
            assert_eq!(values[1].as_deref(), Some("Unknown"));
        }
        other => panic!("expected text, got {other:?}"),
    }
    match &amazon.column("amount").unwrap().values {
        StoredValues::Numeric(values) => assert_eq!(values[1], Some(0.0)),
        other => panic!("expected numbers, got {other:?}"),
    }

    let sales = sink.table("sales_report").unwrap();
    assert_eq!(sales.column_names(), vec!["sku_code", "design_no.", "stock"]);
    match &sales.column("design_no.").unwrap().values {
        StoredValues::Text(values) => assert_eq!(values[0].as_deref(), Some("Müller")),
        other => panic!("expected text, got {other:?}"),
    }

    for dataset in pipeline.registry().iter() {
        assert_eq!(dataset.state, DatasetState::Persisted);
    }
}

#[test]
fn unavailable_store_skips_persist_but_still_reports() {
    let dir = fixture();
    let mut pipeline = Pipeline::new(config_for(dir.path()).pipeline_options());
    pipeline.load();
    pipeline.normalize();

    let unreachable = dir.path().join("no-such-dir").join("store.db");
    let store = StoreConfig::sqlite(unreachable.display().to_string());
    assert_eq!(pipeline.persist_with(|| SqlSink::connect(&store)), 0);
    let report = pipeline.report();

    assert_eq!(report.datasets.len(), 2);
    assert_eq!(report.persisted_count(), 0);
    assert!(pipeline.succeeded());

    let store_failure = pipeline
        .failures()
        .iter()
        .find(|failure| failure.stage == PipelineStage::Persisted)
        .unwrap();
    assert!(store_failure.dataset.is_none());
    for dataset in pipeline.registry().iter() {
        assert_eq!(dataset.state, DatasetState::Normalized);
    }
}

#[test]
fn parallel_and_sequential_loads_agree() {
    let dir = fixture();
    let mut config = config_for(dir.path());

    let mut sequential = Pipeline::new(config.pipeline_options());
    sequential.load();
    config.parallel_load = true;
    let mut parallel = Pipeline::new(config.pipeline_options());
    parallel.load();

    let left: Vec<_> = sequential.registry().names().into_iter().cloned().collect();
    let right: Vec<_> = parallel.registry().names().into_iter().cloned().collect();
    assert_eq!(left, right);
    for (a, b) in sequential.registry().iter().zip(parallel.registry().iter()) {
        assert!(a.table.equals_missing(&b.table));
    }
}

#[test]
fn report_before_load_is_empty() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(config_for(dir.path()).pipeline_options());

    let report = pipeline.report();

    assert!(report.is_empty());
    assert_eq!(report.total_records, 0);
    assert!(!pipeline.succeeded());
}

#[test]
fn all_files_missing_is_not_a_success() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(config_for(dir.path()).pipeline_options());

    assert_eq!(pipeline.load(), 0);
    assert_eq!(pipeline.normalize(), 0);

    assert_eq!(pipeline.failures().len(), 3);
    assert!(!pipeline.succeeded());
    assert!(pipeline.report().is_empty());
}

#[test]
fn boolean_looking_values_survive_normalization() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "Amazon Sale Report.csv",
        b"Order ID,B2B,Qty,Qty\n171-001,True,1,1\n171-002,,2,2\n171-003,False,3,3\n",
    );
    let mut pipeline = Pipeline::new(config_for(dir.path()).pipeline_options());
    pipeline.load();
    pipeline.normalize();

    let amazon = pipeline.registry().get("amazon_sales").unwrap();
    let names: Vec<&str> = amazon
        .table
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();
    assert_eq!(names, vec!["order_id", "b2b", "qty", "qty_2"]);
    let b2b: Vec<Option<&str>> = amazon
        .table
        .column("b2b")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(b2b, vec![Some("True"), Some("Unknown"), Some("False")]);
}
