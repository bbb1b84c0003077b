pub mod aggregate;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod report;
pub mod schema;
pub mod temporal;
pub mod types;

pub use dataset::{Dataset, SourceKey};
pub use error::{PipelineError, Result};
pub use filter::{filter_dataset, DimensionSelection, FilteredView, Selection};
pub use schema::{Field, FieldMap};
pub use types::{Availability, Kpi};
