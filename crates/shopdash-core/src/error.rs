// crates/shopdash-core/src/error.rs

use shopdash_parser::ParserError;
use thiserror::Error;

/// Failures that abort the pipeline. Everything finer grained (missing
/// columns, unparseable cells, empty selections) is absorbed into result
/// markers and never surfaces here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Source unavailable: {0}")]
    SourceUnavailable(#[from] ParserError),

    #[error("Cannot access source {path}: {source}")]
    SourceAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl PipelineError {
    pub fn is_source_unavailable(&self) -> bool {
        matches!(
            self,
            PipelineError::SourceUnavailable(_) | PipelineError::SourceAccess { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
