use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use retail_cli::pipeline::DatasetFailure;
use retail_report::{DatasetSummary, Report};

use crate::types::RunOutcome;

pub fn print_summary(outcome: &RunOutcome) {
    println!("Data: {}", outcome.data_dir.display());
    if let Some(store) = &outcome.store {
        println!("Store: {store}");
    }
    println!("{}", summary_table(&outcome.report));
    println!(
        "Total records processed: {}",
        format_count(outcome.report.total_records)
    );
    if let Some(table) = failure_table(&outcome.failures) {
        println!();
        println!("Skipped or failed:");
        println!("{table}");
    }
}

pub fn summary_table(report: &Report) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Records"),
        header_cell("Columns"),
        header_cell("Column preview"),
        header_cell("Encoding"),
        header_cell("Stored"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    for summary in &report.datasets {
        table.add_row(dataset_row(summary));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format_count(report.total_records)).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(report.persisted_count()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn dataset_row(summary: &DatasetSummary) -> Vec<Cell> {
    vec![
        Cell::new(&summary.title)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(format_count(summary.records)),
        Cell::new(summary.columns),
        Cell::new(summary.preview.to_string()),
        dim_cell(&summary.encoding),
        stored_cell(summary.persisted),
    ]
}

fn failure_table(failures: &[DatasetFailure]) -> Option<Table> {
    if failures.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Stage"),
        header_cell("Reason"),
    ]);
    apply_table_style(&mut table);
    for failure in failures {
        let dataset = match &failure.dataset {
            Some(name) => Cell::new(name).fg(Color::Blue),
            None => dim_cell("(all)"),
        };
        table.add_row(vec![
            dataset,
            Cell::new(failure.stage).fg(Color::Yellow),
            Cell::new(&failure.reason).fg(Color::Red),
        ]);
    }
    Some(table)
}

/// Group digits in thousands: `12345` -> `12,345`.
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn stored_cell(persisted: bool) -> Cell {
    if persisted {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
