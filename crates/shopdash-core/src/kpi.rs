// crates/shopdash-core/src/kpi.rs

use std::collections::HashSet;

use serde::Serialize;

use crate::filter::FilteredView;
use crate::schema::Field;
use crate::types::{Availability, Kpi};

/// Scalar summary of a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiBag {
    pub total_sales: Kpi,
    pub gross_income: Kpi,
    pub avg_rating: Kpi,
    pub total_orders: Kpi,
    pub unique_customers: Kpi,
}

pub fn compute_kpis(view: &FilteredView<'_>) -> KpiBag {
    KpiBag {
        total_sales: sum_of(view, Field::Total),
        gross_income: sum_of(view, Field::GrossIncome),
        avg_rating: mean_of(view, Field::Rating),
        total_orders: distinct_count(view, Field::OrderId),
        unique_customers: distinct_count(view, Field::CustomerId),
    }
}

/// Sum over non-null cells; 0 for an empty view.
pub fn sum_of(view: &FilteredView<'_>, field: Field) -> Kpi {
    let Availability::Available(column) = view.dataset().column(field) else {
        return Kpi::Unavailable;
    };
    let total = view
        .rows()
        .iter()
        .filter_map(|&row| column.number(row))
        .sum::<f64>();
    Kpi::Value(total)
}

/// Mean over non-null cells; `Undefined` when there is nothing to average.
pub fn mean_of(view: &FilteredView<'_>, field: Field) -> Kpi {
    let Availability::Available(column) = view.dataset().column(field) else {
        return Kpi::Unavailable;
    };
    let (sum, count) = view
        .rows()
        .iter()
        .filter_map(|&row| column.number(row))
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        Kpi::Undefined
    } else {
        Kpi::Value(sum / count as f64)
    }
}

/// Number of distinct non-null values of a text field.
pub fn distinct_count(view: &FilteredView<'_>, field: Field) -> Kpi {
    let Availability::Available(column) = view.dataset().column(field) else {
        return Kpi::Unavailable;
    };
    let distinct: HashSet<&str> = view
        .rows()
        .iter()
        .filter_map(|&row| column.text(row))
        .collect();
    Kpi::Count(distinct.len() as u64)
}
