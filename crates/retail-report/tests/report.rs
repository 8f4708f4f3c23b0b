//! Integration tests for the run summary.

use polars::prelude::{Column, DataFrame};

use retail_model::{Dataset, DatasetName, DatasetState, Registry};
use retail_report::summarize;

fn dataset(name: &str, rows: usize, width: usize, state: DatasetState) -> Dataset {
    let columns = (0..width)
        .map(|idx| {
            let values: Vec<i64> = (0..rows as i64).collect();
            Column::new(format!("col_{idx}").into(), values)
        })
        .collect();
    let table = DataFrame::new(columns).unwrap();
    let mut dataset = Dataset::loaded(
        DatasetName::new(name).unwrap(),
        format!("{name}.csv"),
        "UTF-8",
        table,
    );
    dataset.state = state;
    dataset
}

#[test]
fn totals_follow_registry_order() {
    let mut registry = Registry::new();
    registry
        .insert(dataset("sales_report", 3, 2, DatasetState::Normalized))
        .unwrap();
    registry
        .insert(dataset("amazon_sales", 5, 7, DatasetState::Persisted))
        .unwrap();

    let report = summarize(&registry);

    assert_eq!(report.total_records, 8);
    let names: Vec<&str> = report.datasets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["sales_report", "amazon_sales"]);

    let amazon = &report.datasets[1];
    assert_eq!(amazon.title, "AMAZON SALES");
    assert_eq!(amazon.columns, 7);
    assert!(amazon.preview.is_truncated());
    assert_eq!(amazon.preview.to_string(), "col_0, col_1, col_2, col_3, col_4...");
    assert!(amazon.persisted);
    assert!(!report.datasets[0].persisted);
    assert_eq!(report.persisted_count(), 1);
}

#[test]
fn empty_registry_gives_zero_totals() {
    let report = summarize(&Registry::new());

    assert!(report.is_empty());
    assert_eq!(report.total_records, 0);
}

#[test]
fn datasets_that_were_not_normalized_are_left_out() {
    let mut registry = Registry::new();
    registry
        .insert(dataset("expenses", 4, 2, DatasetState::Loaded))
        .unwrap();
    registry
        .insert(dataset("may_2022_sales", 2, 1, DatasetState::Normalized))
        .unwrap();

    let report = summarize(&registry);

    assert_eq!(report.datasets.len(), 1);
    assert_eq!(report.total_records, 2);
    assert_eq!(report.datasets[0].name, "may_2022_sales");
}

#[test]
fn report_serializes_preview_and_counts() {
    let mut registry = Registry::new();
    registry
        .insert(dataset("sales_report", 1, 2, DatasetState::Normalized))
        .unwrap();

    let json = serde_json::to_value(summarize(&registry)).unwrap();

    assert_eq!(json["total_records"], 1);
    assert_eq!(json["datasets"][0]["preview"]["names"][1], "col_1");
    assert_eq!(json["datasets"][0]["preview"]["truncated"], false);
}
