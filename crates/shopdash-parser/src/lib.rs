pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::{ParserAttempt, ParserError};
pub use model::RawTable;
pub use registry::{parse_table, parse_with_parsers, read_table_file, TableParser};

#[cfg(test)]
mod tests;
