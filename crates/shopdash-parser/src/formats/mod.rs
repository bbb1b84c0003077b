mod common;
mod delimited;

pub use delimited::DelimitedParser;

pub(crate) use common::{header_line, is_blank_record, strip_bom};
