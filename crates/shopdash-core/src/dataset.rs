// crates/shopdash-core/src/dataset.rs

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{NaiveDate, NaiveTime};
use polars::prelude::*;
use serde::Serialize;
use shopdash_parser::RawTable;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::schema::{Field, FieldKind, FieldMap};
use crate::temporal::{
    date_from_days, days_since_epoch, month_name, nanos_since_midnight, parse_date, parse_time,
    time_from_nanos, weekday_name,
};
use crate::types::Availability;

// 2^63 itself is out of range for i64.
const I64_RANGE: std::ops::Range<f64> = i64::MIN as f64..i64::MAX as f64;

static NULL_TOKENS: &[&str] = &["", "nan", "null", "na", "n/a", "none"];

/// Identity of the source a dataset was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceKey {
    pub path: Option<PathBuf>,
    pub len: u64,
    pub modified: Option<SystemTime>,
    pub content_hash: String,
}

impl SourceKey {
    pub fn in_memory(content_hash: impl Into<String>) -> Self {
        Self {
            path: None,
            len: 0,
            modified: None,
            content_hash: content_hash.into(),
        }
    }

    /// Reads file metadata without touching the contents.
    pub fn probe(path: &Path) -> Result<Self> {
        let canonical = path
            .canonicalize()
            .map_err(|source| PipelineError::SourceAccess {
                path: path.display().to_string(),
                source,
            })?;
        let metadata = fs::metadata(&canonical).map_err(|source| PipelineError::SourceAccess {
            path: canonical.display().to_string(),
            source,
        })?;

        Ok(Self {
            path: Some(canonical),
            len: metadata.len(),
            modified: metadata.modified().ok(),
            content_hash: String::new(),
        })
    }

    /// Same file, same size, same modification time.
    pub fn same_revision(&self, other: &SourceKey) -> bool {
        self.path == other.path && self.len == other.len && self.modified == other.modified
    }
}

/// Typed storage for one normalized column.
#[derive(Debug, Clone)]
pub enum ColumnValues {
    Text(StringChunked),
    Integer(Int64Chunked),
    Decimal(Float64Chunked),
    /// Days since the Unix epoch.
    Date(Int32Chunked),
    /// Nanoseconds since midnight.
    Time(Int64Chunked),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Text(ca) => ca.len(),
            ColumnValues::Integer(ca) | ColumnValues::Time(ca) => ca.len(),
            ColumnValues::Decimal(ca) => ca.len(),
            ColumnValues::Date(ca) => ca.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            ColumnValues::Text(ca) => ca.null_count(),
            ColumnValues::Integer(ca) | ColumnValues::Time(ca) => ca.null_count(),
            ColumnValues::Decimal(ca) => ca.null_count(),
            ColumnValues::Date(ca) => ca.null_count(),
        }
    }

    pub fn text(&self, row: usize) -> Option<&str> {
        match self {
            ColumnValues::Text(ca) => ca.get(row),
            _ => None,
        }
    }

    pub fn number(&self, row: usize) -> Option<f64> {
        match self {
            ColumnValues::Integer(ca) => ca.get(row).map(|value| value as f64),
            ColumnValues::Decimal(ca) => ca.get(row),
            _ => None,
        }
    }

    pub fn date(&self, row: usize) -> Option<NaiveDate> {
        match self {
            ColumnValues::Date(ca) => ca.get(row).and_then(date_from_days),
            _ => None,
        }
    }

    pub fn time(&self, row: usize) -> Option<NaiveTime> {
        match self {
            ColumnValues::Time(ca) => ca.get(row).and_then(time_from_nanos),
            _ => None,
        }
    }

    fn to_series(&self, name: &str) -> PolarsResult<Series> {
        let series = match self {
            ColumnValues::Text(ca) => ca.clone().into_series(),
            ColumnValues::Integer(ca) => ca.clone().into_series(),
            ColumnValues::Decimal(ca) => ca.clone().into_series(),
            ColumnValues::Date(ca) => ca.clone().into_series().cast(&DataType::Date)?,
            ColumnValues::Time(ca) => ca.clone().into_series().cast(&DataType::Time)?,
        };
        Ok(series.with_name(name.into()))
    }
}

/// Per-field counts of cells that could not be parsed and were set to null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentReport {
    pub parse_failures: BTreeMap<Field, usize>,
}

impl EnrichmentReport {
    pub fn failures(&self, field: Field) -> usize {
        self.parse_failures.get(&field).copied().unwrap_or(0)
    }

    pub fn total_failures(&self) -> usize {
        self.parse_failures.values().sum()
    }
}

/// The normalized, enriched, read-only transaction table.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: SourceKey,
    fields: FieldMap,
    height: usize,
    columns: HashMap<Field, ColumnValues>,
    enrichment: EnrichmentReport,
}

impl Dataset {
    pub fn from_table(table: &RawTable, source: SourceKey) -> Self {
        let fields = FieldMap::from_headers(&table.headers);
        let mut columns = HashMap::new();
        let mut enrichment = EnrichmentReport::default();

        for field in Field::ALL {
            let Some(index) = fields.resolve(field) else {
                continue;
            };
            let Some((values, failures)) = normalize_column(field, table.column(index)) else {
                continue;
            };
            if failures > 0 {
                enrichment.parse_failures.insert(field, failures);
            }
            columns.insert(field, values);
        }

        let derived = match columns.get(&Field::Date) {
            Some(ColumnValues::Date(days)) => Some(derive_calendar(days)),
            _ => None,
        };
        if let Some((weekdays, months)) = derived {
            columns.insert(Field::DayOfWeek, weekdays);
            columns.insert(Field::MonthName, months);
        }

        let dataset = Self {
            source,
            fields,
            height: table.row_count(),
            columns,
            enrichment,
        };

        let missing = dataset.missing_fields(&Field::ALL);
        info!(
            rows = dataset.height,
            columns = dataset.fields.len(),
            format = table.format,
            missing = ?missing,
            "dataset loaded"
        );
        for (field, count) in &dataset.enrichment.parse_failures {
            warn!(field = %field, count = *count, "unparseable cells set to null");
        }

        dataset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn source(&self) -> &SourceKey {
        &self.source
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn enrichment(&self) -> &EnrichmentReport {
        &self.enrichment
    }

    pub fn has(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    pub fn column(&self, field: Field) -> Availability<&ColumnValues> {
        self.columns.get(&field).into()
    }

    pub fn present_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.has(*field))
            .collect()
    }

    /// Canonical keys of the requested fields this dataset lacks.
    pub fn missing_fields(&self, requested: &[Field]) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for field in requested {
            let key = field.canonical_key();
            if !self.has(*field) && !missing.contains(&key) {
                missing.push(key);
            }
        }
        missing
    }

    /// Observed non-null values of a text field in first-appearance order.
    pub fn distinct_values(&self, field: Field) -> Availability<Vec<String>> {
        let Availability::Available(column) = self.column(field) else {
            return Availability::Unavailable;
        };

        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for row in 0..self.height {
            if let Some(value) = column.text(row) {
                if seen.insert(value) {
                    values.push(value.to_string());
                }
            }
        }
        Availability::Available(values)
    }

    pub fn has_nulls(&self, field: Field) -> bool {
        self.columns
            .get(&field)
            .is_some_and(|column| column.null_count() > 0)
    }

    /// Materializes the normalized columns as a polars frame.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut frame_columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        for field in Field::ALL {
            if let Some(values) = self.columns.get(&field) {
                frame_columns.push(values.to_series(field.column_name())?.into());
            }
        }
        Ok(DataFrame::new(frame_columns)?)
    }
}

enum Cell<T> {
    Value(T),
    Null,
    Invalid,
}

fn normalize_column<'a>(
    field: Field,
    cells: impl Iterator<Item = &'a str>,
) -> Option<(ColumnValues, usize)> {
    let name = field.column_name();
    let mut failures = 0usize;

    let values = match field.kind() {
        FieldKind::Category | FieldKind::Identifier => {
            let ca: StringChunked = cells.map(clean_text).collect();
            ColumnValues::Text(ca.with_name(name.into()))
        }
        FieldKind::Integer => {
            let ca: Int64Chunked = cells
                .map(|raw| tally(parse_integer(raw), &mut failures))
                .collect();
            ColumnValues::Integer(ca.with_name(name.into()))
        }
        FieldKind::Decimal => {
            let ca: Float64Chunked = cells
                .map(|raw| tally(parse_decimal(raw), &mut failures))
                .collect();
            ColumnValues::Decimal(ca.with_name(name.into()))
        }
        FieldKind::Date => {
            let ca: Int32Chunked = cells
                .map(|raw| {
                    tally(parse_temporal(raw, parse_date), &mut failures).map(days_since_epoch)
                })
                .collect();
            ColumnValues::Date(ca.with_name(name.into()))
        }
        FieldKind::Time => {
            let ca: Int64Chunked = cells
                .map(|raw| {
                    tally(parse_temporal(raw, parse_time), &mut failures).map(nanos_since_midnight)
                })
                .collect();
            ColumnValues::Time(ca.with_name(name.into()))
        }
        FieldKind::Derived => return None,
    };

    Some((values, failures))
}

fn tally<T>(cell: Cell<T>, failures: &mut usize) -> Option<T> {
    match cell {
        Cell::Value(value) => Some(value),
        Cell::Null => None,
        Cell::Invalid => {
            *failures += 1;
            None
        }
    }
}

fn derive_calendar(days: &Int32Chunked) -> (ColumnValues, ColumnValues) {
    let dates: Vec<Option<NaiveDate>> = days
        .into_iter()
        .map(|value| value.and_then(date_from_days))
        .collect();

    let weekdays: StringChunked = dates.iter().map(|date| date.map(weekday_name)).collect();
    let months: StringChunked = dates.iter().map(|date| date.map(month_name)).collect();

    (
        ColumnValues::Text(weekdays.with_name(Field::DayOfWeek.column_name().into())),
        ColumnValues::Text(months.with_name(Field::MonthName.column_name().into())),
    )
}

fn clean_text(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn is_null_token(trimmed: &str) -> bool {
    NULL_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
}

fn numeric_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if is_null_token(trimmed) {
        return None;
    }
    Some(
        trimmed
            .trim_start_matches('$')
            .chars()
            .filter(|ch| *ch != ',')
            .collect(),
    )
}

fn parse_decimal(raw: &str) -> Cell<f64> {
    let Some(text) = numeric_text(raw) else {
        return Cell::Null;
    };
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::Value(value),
        _ => Cell::Invalid,
    }
}

fn parse_integer(raw: &str) -> Cell<i64> {
    let Some(text) = numeric_text(raw) else {
        return Cell::Null;
    };
    if let Ok(value) = text.parse::<i64>() {
        return Cell::Value(value);
    }
    match text.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && I64_RANGE.contains(&value) => Cell::Value(value as i64),
        _ => Cell::Invalid,
    }
}

fn parse_temporal<T>(raw: &str, parse: impl Fn(&str) -> Option<T>) -> Cell<T> {
    let trimmed = raw.trim();
    if is_null_token(trimmed) {
        return Cell::Null;
    }
    match parse(trimmed) {
        Some(value) => Cell::Value(value),
        None => Cell::Invalid,
    }
}
