// crates/shopdash-core/src/types.rs

use serde::{Deserialize, Serialize};

/// Outcome of a computation that depends on optional source columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Availability<T> {
    Available(T),
    Unavailable,
}

impl<T> Availability<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available(_))
    }

    pub fn as_ref(&self) -> Availability<&T> {
        match self {
            Availability::Available(value) => Availability::Available(value),
            Availability::Unavailable => Availability::Unavailable,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Availability<U> {
        match self {
            Availability::Available(value) => Availability::Available(f(value)),
            Availability::Unavailable => Availability::Unavailable,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Availability::Available(value) => Some(value),
            Availability::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Availability<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Availability::Available(value),
            None => Availability::Unavailable,
        }
    }
}

/// A single scalar summary statistic.
///
/// `Undefined` means the statistic has no value for zero observations (a mean
/// over nothing); `Unavailable` means the column it needs is not in the
/// dataset at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Kpi {
    Value(f64),
    Count(u64),
    Undefined,
    Unavailable,
}

impl Kpi {
    pub fn value(&self) -> Option<f64> {
        match self {
            Kpi::Value(value) => Some(*value),
            Kpi::Count(count) => Some(*count as f64),
            Kpi::Undefined | Kpi::Unavailable => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Kpi::Unavailable)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Kpi::Undefined)
    }
}
