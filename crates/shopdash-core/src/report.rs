// crates/shopdash-core/src/report.rs

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::{
    distribution_by, AggregateRequest, AggregateView, CalendarBucket, Distribution, Metric,
    DEFAULT_TOP_N,
};
use crate::dataset::{Dataset, EnrichmentReport};
use crate::filter::{filter_dataset, Selection};
use crate::kpi::{compute_kpis, KpiBag};
use crate::schema::Field;
use crate::types::Availability;

/// Fields the standard dashboard reads. Absent ones are listed in
/// `DashboardReport::missing_fields`.
pub const DASHBOARD_FIELDS: [Field; 12] = [
    Field::Branch,
    Field::ProductLine,
    Field::Product,
    Field::Gender,
    Field::Payment,
    Field::CustomerId,
    Field::OrderId,
    Field::Total,
    Field::GrossIncome,
    Field::Rating,
    Field::Date,
    Field::Time,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub top_n: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

pub fn standard_aggregates(options: &ReportOptions) -> Vec<(&'static str, AggregateRequest)> {
    let total = Metric::Sum(Field::Total);
    vec![
        ("daily_sales", AggregateRequest::DailySales),
        (
            "sales_by_branch",
            AggregateRequest::Ranking {
                group: Field::Branch,
                metric: total,
                top_n: None,
            },
        ),
        (
            "sales_by_product_line",
            AggregateRequest::Ranking {
                group: Field::ProductLine,
                metric: total,
                top_n: None,
            },
        ),
        (
            "gender_distribution",
            AggregateRequest::Ranking {
                group: Field::Gender,
                metric: Metric::Count,
                top_n: None,
            },
        ),
        (
            "payment_methods",
            AggregateRequest::Ranking {
                group: Field::Payment,
                metric: Metric::Count,
                top_n: None,
            },
        ),
        (
            "monthly_sales",
            AggregateRequest::Calendar(CalendarBucket::Month),
        ),
        (
            "weekday_sales",
            AggregateRequest::Calendar(CalendarBucket::Weekday),
        ),
        ("hourly_sales", AggregateRequest::Calendar(CalendarBucket::Hour)),
        (
            "top_products",
            AggregateRequest::Ranking {
                group: Field::Product,
                metric: total,
                top_n: Some(options.top_n),
            },
        ),
        (
            "top_customers",
            AggregateRequest::Ranking {
                group: Field::CustomerId,
                metric: total,
                top_n: Some(options.top_n),
            },
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedAggregate {
    pub name: &'static str,
    pub view: Availability<AggregateView>,
}

/// Everything the rendering side needs for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub missing_fields: Vec<&'static str>,
    pub enrichment: EnrichmentReport,
    pub kpis: KpiBag,
    pub aggregates: Vec<NamedAggregate>,
    pub rating_by_payment: Availability<Vec<Distribution>>,
}

impl DashboardReport {
    pub fn aggregate(&self, name: &str) -> Option<&Availability<AggregateView>> {
        self.aggregates
            .iter()
            .find(|aggregate| aggregate.name == name)
            .map(|aggregate| &aggregate.view)
    }

    pub fn has_no_rows(&self) -> bool {
        self.filtered_rows == 0
    }
}

pub fn build_report(
    dataset: &Dataset,
    selection: &Selection,
    options: &ReportOptions,
) -> DashboardReport {
    let view = filter_dataset(dataset, selection);

    let aggregates = standard_aggregates(options)
        .into_iter()
        .map(|(name, request)| NamedAggregate {
            name,
            view: request.compute(&view),
        })
        .collect();

    let report = DashboardReport {
        total_rows: dataset.height(),
        filtered_rows: view.len(),
        missing_fields: dataset.missing_fields(&DASHBOARD_FIELDS),
        enrichment: dataset.enrichment().clone(),
        kpis: compute_kpis(&view),
        aggregates,
        rating_by_payment: distribution_by(&view, Field::Payment, Field::Rating),
    };

    info!(
        total_rows = report.total_rows,
        filtered_rows = report.filtered_rows,
        missing = report.missing_fields.len(),
        "dashboard report built"
    );

    report
}
