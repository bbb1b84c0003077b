// crates/shopdash-core/src/filter.rs

use std::collections::BTreeSet;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::schema::Field;
use crate::types::Availability;

/// Allowed values for one category dimension.
///
/// `All` is the default selection and admits every row. `Only` admits rows
/// whose value is in `values`; an empty `values` set admits nothing. Rows
/// with no value for the dimension pass only when `include_missing` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSelection {
    #[default]
    All,
    Only {
        values: BTreeSet<String>,
        include_missing: bool,
    },
}

impl DimensionSelection {
    pub fn only<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DimensionSelection::Only {
            values: values.into_iter().map(Into::into).collect(),
            include_missing: false,
        }
    }

    /// The explicitly empty selection.
    pub fn none() -> Self {
        DimensionSelection::Only {
            values: BTreeSet::new(),
            include_missing: false,
        }
    }

    /// Every value the dataset has for `field`, including the missing marker
    /// when some rows have no value.
    pub fn observed(dataset: &Dataset, field: Field) -> Self {
        match dataset.distinct_values(field) {
            Availability::Available(values) => DimensionSelection::Only {
                values: values.into_iter().collect(),
                include_missing: dataset.has_nulls(field),
            },
            Availability::Unavailable => DimensionSelection::All,
        }
    }

    pub fn allows(&self, value: Option<&str>) -> bool {
        match (self, value) {
            (DimensionSelection::All, _) => true,
            (DimensionSelection::Only { values, .. }, Some(value)) => values.contains(value),
            (DimensionSelection::Only { include_missing, .. }, None) => *include_missing,
        }
    }
}

/// The active filter: one selection per category dimension in scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub branches: DimensionSelection,
    pub product_lines: DimensionSelection,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn observed(dataset: &Dataset) -> Self {
        Self {
            branches: DimensionSelection::observed(dataset, Field::Branch),
            product_lines: DimensionSelection::observed(dataset, Field::ProductLine),
        }
    }

    pub fn with_branches(mut self, branches: DimensionSelection) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_product_lines(mut self, product_lines: DimensionSelection) -> Self {
        self.product_lines = product_lines;
        self
    }

    fn dimensions(&self) -> [(Field, &DimensionSelection); 2] {
        [
            (Field::Branch, &self.branches),
            (Field::ProductLine, &self.product_lines),
        ]
    }
}

/// Rows of a dataset that satisfy a selection, in dataset order. Borrows the
/// dataset; holds only row positions.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn full(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            rows: (0..dataset.height()).collect(),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copies the selected rows out into a polars frame.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let frame = self.dataset.to_frame()?;
        if frame.width() == 0 {
            return Ok(frame);
        }
        let indices = IdxCa::from_vec(
            "rows".into(),
            self.rows.iter().map(|&row| row as IdxSize).collect(),
        );
        Ok(frame.take(&indices)?)
    }
}

/// Narrows the dataset to the rows allowed by every dimension in scope. A
/// dimension whose field is absent from the dataset imposes no constraint.
pub fn filter_dataset<'a>(dataset: &'a Dataset, selection: &Selection) -> FilteredView<'a> {
    let constraints: Vec<_> = selection
        .dimensions()
        .into_iter()
        .filter(|(_, allowed)| **allowed != DimensionSelection::All)
        .filter_map(|(field, allowed)| {
            dataset
                .column(field)
                .into_option()
                .map(|column| (column, allowed))
        })
        .collect();

    let rows: Vec<usize> = (0..dataset.height())
        .filter(|&row| {
            constraints
                .iter()
                .all(|(column, allowed)| allowed.allows(column.text(row)))
        })
        .collect();

    debug!(
        total = dataset.height(),
        kept = rows.len(),
        constraints = constraints.len(),
        "filter applied"
    );

    FilteredView { dataset, rows }
}
