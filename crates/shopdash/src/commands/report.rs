// crates/shopdash/src/commands/report.rs

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use shopdash_core::config::DashboardConfig;
use shopdash_core::report::build_report;
use shopdash_core::{filter_dataset, Dataset, DimensionSelection, Selection};
use tracing::info;

use super::load_dataset;
use crate::render;

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Keep only these branches (repeatable)
    #[arg(long = "branch", value_name = "BRANCH", conflicts_with = "no_branch")]
    branches: Vec<String>,

    /// Keep only these product lines (repeatable)
    #[arg(long = "product-line", value_name = "LINE", conflicts_with = "no_product_line")]
    product_lines: Vec<String>,

    /// Select no branch at all
    #[arg(long)]
    no_branch: bool,

    /// Select no product line at all
    #[arg(long)]
    no_product_line: bool,

    /// Length of the top products / customers rankings
    #[arg(long)]
    top_n: Option<usize>,

    /// Print the first N filtered rows
    #[arg(long, value_name = "N")]
    preview: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl ReportArgs {
    pub fn selection(&self, dataset: &Dataset) -> Selection {
        let observed = Selection::observed(dataset);
        Selection::all()
            .with_branches(dimension(&self.branches, self.no_branch, observed.branches))
            .with_product_lines(dimension(
                &self.product_lines,
                self.no_product_line,
                observed.product_lines,
            ))
    }
}

fn dimension(values: &[String], none: bool, observed: DimensionSelection) -> DimensionSelection {
    if none {
        DimensionSelection::none()
    } else if values.is_empty() {
        observed
    } else {
        DimensionSelection::only(values.iter().map(String::as_str))
    }
}

pub fn handle_report_command(source: &Path, config: &DashboardConfig, args: &ReportArgs) -> Result<()> {
    let dataset = load_dataset(source)?;
    let selection = args.selection(&dataset);

    let mut options = config.report_options();
    if let Some(top_n) = args.top_n {
        options.top_n = top_n;
    }

    let report = build_report(&dataset, &selection, &options);
    info!(
        filtered_rows = report.filtered_rows,
        total_rows = report.total_rows,
        "report ready"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
    } else {
        print!("{}", render::report_text(&report));
    }

    if let Some(rows) = args.preview {
        let frame = filter_dataset(&dataset, &selection)
            .to_frame()
            .context("failed to build preview frame")?;
        println!("{}", frame.head(Some(rows)));
    }
    Ok(())
}
