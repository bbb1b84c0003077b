// crates/shopdash/src/render.rs

use std::fmt::Write;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use shopdash_core::aggregate::{AggregateView, Distribution};
use shopdash_core::report::DashboardReport;
use shopdash_core::schema::FieldKind;
use shopdash_core::{Availability, Dataset, Field, Kpi};

const UNAVAILABLE: &str = "n/a (field missing)";

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn number_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

pub fn kpi_text(kpi: &Kpi) -> String {
    match kpi {
        Kpi::Value(value) => format!("{value:.2}"),
        Kpi::Count(count) => count.to_string(),
        Kpi::Undefined => "-".to_string(),
        Kpi::Unavailable => UNAVAILABLE.to_string(),
    }
}

pub fn aggregate_table(view: &AggregateView) -> Table {
    let mut table = new_table(vec!["Group", "Value"]);
    for entry in view.entries() {
        table.add_row(vec![Cell::new(entry.key.to_string()), number_cell(entry.value)]);
    }
    table
}

pub fn distribution_table(distributions: &[Distribution]) -> Table {
    let mut table = new_table(vec![
        "Group", "Count", "Min", "Q1", "Median", "Q3", "Max", "Mean",
    ]);
    for d in distributions {
        table.add_row(vec![
            Cell::new(&d.group),
            Cell::new(d.count).set_alignment(CellAlignment::Right),
            number_cell(d.min),
            number_cell(d.q1),
            number_cell(d.median),
            number_cell(d.q3),
            number_cell(d.max),
            number_cell(d.mean),
        ]);
    }
    table
}

pub fn fields_table(dataset: &Dataset) -> Table {
    let mut table = new_table(vec!["Field", "Source column", "Status"]);
    for field in Field::ALL {
        let source = match dataset.fields().source_header(field) {
            Some(header) => header.to_string(),
            None if field.kind() == FieldKind::Derived && dataset.has(field) => {
                "(derived from date)".to_string()
            }
            None => String::new(),
        };
        let status = if dataset.has(field) { "present" } else { "missing" };
        table.add_row(vec![field.canonical_key(), source.as_str(), status]);
    }
    table
}

/// Human-readable rendering of a full dashboard report.
pub fn report_text(report: &DashboardReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Rows: {} of {}",
        report.filtered_rows, report.total_rows
    );
    if !report.missing_fields.is_empty() {
        let _ = writeln!(out, "Missing fields: {}", report.missing_fields.join(", "));
    }
    if report.enrichment.total_failures() > 0 {
        for (field, count) in &report.enrichment.parse_failures {
            let _ = writeln!(out, "Unparseable {field} cells: {count}");
        }
    }
    if report.has_no_rows() {
        let _ = writeln!(out, "No rows match the current selection.");
    }

    let mut kpis = new_table(vec!["KPI", "Value"]);
    kpis.add_row(vec!["Total sales", kpi_text(&report.kpis.total_sales).as_str()]);
    kpis.add_row(vec!["Gross income", kpi_text(&report.kpis.gross_income).as_str()]);
    kpis.add_row(vec!["Average rating", kpi_text(&report.kpis.avg_rating).as_str()]);
    kpis.add_row(vec!["Orders", kpi_text(&report.kpis.total_orders).as_str()]);
    kpis.add_row(vec!["Customers", kpi_text(&report.kpis.unique_customers).as_str()]);
    let _ = writeln!(out, "\n{kpis}");

    for aggregate in &report.aggregates {
        let _ = writeln!(out, "\n{}", aggregate.name);
        match &aggregate.view {
            Availability::Available(view) if view.is_empty() => {
                let _ = writeln!(out, "(no data)");
            }
            Availability::Available(view) => {
                let _ = writeln!(out, "{}", aggregate_table(view));
            }
            Availability::Unavailable => {
                let _ = writeln!(out, "{UNAVAILABLE}");
            }
        }
    }

    let _ = writeln!(out, "\nrating_by_payment");
    match &report.rating_by_payment {
        Availability::Available(distributions) if distributions.is_empty() => {
            let _ = writeln!(out, "(no data)");
        }
        Availability::Available(distributions) => {
            let _ = writeln!(out, "{}", distribution_table(distributions));
        }
        Availability::Unavailable => {
            let _ = writeln!(out, "{UNAVAILABLE}");
        }
    }

    out
}
