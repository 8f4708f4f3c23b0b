use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};
use tracing::{info, info_span};

use retail_cli::config::EtlConfig;
use retail_cli::pipeline::Pipeline;
use retail_persistence::SqlSink;

use crate::cli::{DatasetsArgs, RunArgs};
use crate::summary::apply_table_style;
use crate::types::RunOutcome;

pub fn run_datasets(args: &DatasetsArgs) -> Result<()> {
    let config = EtlConfig::load(args.config.as_deref())?;
    let mut table = Table::new();
    table.set_header(vec!["Dataset", "File", "Present"]);
    apply_table_style(&mut table);
    for entry in &config.datasets {
        let present = config.data_dir.join(&entry.file).is_file();
        let marker = if present {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("missing").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&entry.name),
            Cell::new(&entry.file),
            marker,
        ]);
    }
    println!("Data: {}", config.data_dir.display());
    println!("{table}");
    Ok(())
}

pub fn run_etl(args: &RunArgs) -> Result<RunOutcome> {
    let mut config = EtlConfig::load(args.config.as_deref()).context("load configuration")?;
    args.apply_to(&mut config);

    let run_span = info_span!("run", data_dir = %config.data_dir.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let mut pipeline = Pipeline::new(config.pipeline_options());
    pipeline.load();
    pipeline.normalize();

    let store = if args.persist {
        let store = &config.store;
        pipeline.persist_with(|| SqlSink::connect(store));
        Some(store.redacted_url())
    } else {
        None
    };

    let report = pipeline.report();
    info!(
        datasets = report.datasets.len(),
        failures = pipeline.failures().len(),
        duration_ms = start.elapsed().as_millis(),
        "run finished"
    );

    Ok(RunOutcome {
        data_dir: config.data_dir.clone(),
        store,
        succeeded: pipeline.succeeded(),
        failures: pipeline.failures().to_vec(),
        report,
    })
}

/// Emit the outcome as one JSON document on stdout.
pub fn print_json(outcome: &RunOutcome) -> Result<()> {
    let failures: Vec<serde_json::Value> = outcome
        .failures
        .iter()
        .map(|failure| {
            serde_json::json!({
                "dataset": failure.dataset.as_ref().map(ToString::to_string),
                "stage": failure.stage.label(),
                "reason": failure.reason,
            })
        })
        .collect();
    let document = serde_json::json!({
        "data_dir": outcome.data_dir.display().to_string(),
        "store": outcome.store,
        "succeeded": outcome.succeeded,
        "report": outcome.report,
        "failures": failures,
    });
    let text = serde_json::to_string_pretty(&document).context("serialize report")?;
    println!("{text}");
    Ok(())
}
