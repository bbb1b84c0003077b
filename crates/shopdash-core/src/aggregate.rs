// crates/shopdash-core/src/aggregate.rs

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use tracing::debug;

use crate::dataset::ColumnValues;
use crate::filter::FilteredView;
use crate::schema::Field;
use crate::temporal::{month_position, weekday_position, MONTH_NAMES, WEEKDAY_NAMES};
use crate::types::Availability;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Date(NaiveDate),
    Label(String),
}

impl GroupKey {
    pub fn label(value: impl Into<String>) -> Self {
        GroupKey::Label(value.into())
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            GroupKey::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateEntry {
    pub key: GroupKey,
    pub value: f64,
}

/// Ordered (group key, metric) pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregateView {
    entries: Vec<AggregateEntry>,
}

impl AggregateView {
    fn from_pairs(pairs: impl IntoIterator<Item = (GroupKey, f64)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(key, value)| AggregateEntry { key, value })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[AggregateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key.to_string()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|entry| entry.value).collect()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.key.to_string() == key)
            .map(|entry| entry.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Sum(Field),
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarBucket {
    Month,
    Weekday,
    Hour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateRequest {
    /// Sum of `total` per calendar date, ascending by date.
    DailySales,
    /// Metric per category value, descending, ties in first-seen order.
    Ranking {
        group: Field,
        metric: Metric,
        top_n: Option<usize>,
    },
    /// Sum of `total` per calendar bucket in calendar order.
    Calendar(CalendarBucket),
}

impl AggregateRequest {
    pub fn compute(&self, view: &FilteredView<'_>) -> Availability<AggregateView> {
        match *self {
            AggregateRequest::DailySales => time_series(view),
            AggregateRequest::Ranking {
                group,
                metric,
                top_n,
            } => rank_by(view, group, metric, top_n),
            AggregateRequest::Calendar(bucket) => calendar_totals(view, bucket),
        }
    }
}

pub fn time_series(view: &FilteredView<'_>) -> Availability<AggregateView> {
    let dataset = view.dataset();
    let (Availability::Available(dates), Availability::Available(totals)) =
        (dataset.column(Field::Date), dataset.column(Field::Total))
    else {
        debug!("daily sales skipped: date or total missing");
        return Availability::Unavailable;
    };

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for &row in view.rows() {
        let Some(date) = dates.date(row) else {
            continue;
        };
        *by_date.entry(date).or_insert(0.0) += totals.number(row).unwrap_or(0.0);
    }

    debug!(groups = by_date.len(), "daily sales computed");
    Availability::Available(AggregateView::from_pairs(
        by_date
            .into_iter()
            .map(|(date, total)| (GroupKey::Date(date), total)),
    ))
}

pub fn rank_by(
    view: &FilteredView<'_>,
    group: Field,
    metric: Metric,
    top_n: Option<usize>,
) -> Availability<AggregateView> {
    let dataset = view.dataset();
    let Availability::Available(groups) = dataset.column(group) else {
        debug!(group = %group, "ranking skipped: group field missing");
        return Availability::Unavailable;
    };
    if !group.is_textual() {
        return Availability::Unavailable;
    }
    let measure = match metric {
        Metric::Sum(field) if field.is_textual() => return Availability::Unavailable,
        Metric::Sum(field) => match dataset.column(field) {
            Availability::Available(column) => Some(column),
            Availability::Unavailable => {
                debug!(group = %group, field = %field, "ranking skipped: metric field missing");
                return Availability::Unavailable;
            }
        },
        Metric::Count => None,
    };

    let mut order: Vec<(&str, f64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for &row in view.rows() {
        let Some(key) = groups.text(row) else {
            continue;
        };
        let amount = match measure {
            Some(column) => column.number(row).unwrap_or(0.0),
            None => 1.0,
        };
        let position = *positions.entry(key).or_insert_with(|| {
            order.push((key, 0.0));
            order.len() - 1
        });
        order[position].1 += amount;
    }

    // stable: equal metrics keep first-seen order
    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    if let Some(limit) = top_n {
        order.truncate(limit);
    }

    debug!(group = %group, groups = order.len(), "ranking computed");
    Availability::Available(AggregateView::from_pairs(
        order
            .into_iter()
            .map(|(key, value)| (GroupKey::label(key), value)),
    ))
}

pub fn calendar_totals(view: &FilteredView<'_>, bucket: CalendarBucket) -> Availability<AggregateView> {
    let dataset = view.dataset();
    let source = match bucket {
        CalendarBucket::Month => Field::MonthName,
        CalendarBucket::Weekday => Field::DayOfWeek,
        CalendarBucket::Hour => Field::Time,
    };
    let (Availability::Available(buckets), Availability::Available(totals)) =
        (dataset.column(source), dataset.column(Field::Total))
    else {
        debug!(bucket = ?bucket, "calendar totals skipped: field missing");
        return Availability::Unavailable;
    };

    let labels: Vec<String> = match bucket {
        CalendarBucket::Month => MONTH_NAMES.iter().map(|name| name.to_string()).collect(),
        CalendarBucket::Weekday => WEEKDAY_NAMES.iter().map(|name| name.to_string()).collect(),
        CalendarBucket::Hour => (0..24).map(|hour| format!("{hour:02}:00")).collect(),
    };
    let mut sums: Vec<Option<f64>> = vec![None; labels.len()];

    for &row in view.rows() {
        let Some(slot) = bucket_slot(bucket, buckets, row) else {
            continue;
        };
        let sum = sums[slot].get_or_insert(0.0);
        *sum += totals.number(row).unwrap_or(0.0);
    }

    Availability::Available(AggregateView::from_pairs(
        labels
            .into_iter()
            .zip(sums)
            .filter_map(|(label, sum)| sum.map(|value| (GroupKey::Label(label), value))),
    ))
}

fn bucket_slot(bucket: CalendarBucket, column: &ColumnValues, row: usize) -> Option<usize> {
    match bucket {
        CalendarBucket::Month => column.text(row).and_then(month_position),
        CalendarBucket::Weekday => column.text(row).and_then(weekday_position),
        CalendarBucket::Hour => column.time(row).map(|time| time.hour() as usize),
    }
}

/// Five-number summary plus mean of one numeric field within a group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub group: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl Distribution {
    fn from_values(group: &str, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        Some(Self {
            group: group.to_string(),
            count,
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[count - 1],
            mean,
        })
    }
}

/// Linear interpolation between closest ranks over sorted input.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

/// Distribution of `value` per `group`, groups in first-seen order. Groups
/// with no numeric observations are left out.
pub fn distribution_by(
    view: &FilteredView<'_>,
    group: Field,
    value: Field,
) -> Availability<Vec<Distribution>> {
    let dataset = view.dataset();
    let (Availability::Available(groups), Availability::Available(values)) =
        (dataset.column(group), dataset.column(value))
    else {
        debug!(group = %group, value = %value, "distribution skipped: field missing");
        return Availability::Unavailable;
    };

    let mut order: Vec<&str> = Vec::new();
    let mut samples: HashMap<&str, Vec<f64>> = HashMap::new();
    for &row in view.rows() {
        let (Some(key), Some(sample)) = (groups.text(row), values.number(row)) else {
            continue;
        };
        samples
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(sample);
    }

    Availability::Available(
        order
            .into_iter()
            .filter_map(|key| {
                let values = samples.remove(key)?;
                Distribution::from_values(key, values)
            })
            .collect(),
    )
}
