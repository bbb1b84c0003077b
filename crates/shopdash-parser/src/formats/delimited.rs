use crate::errors::ParserError;
use crate::model::RawTable;
use crate::registry::TableParser;

use super::{header_line, is_blank_record, strip_bom};

/// Reads a single-header delimited text table.
///
/// Non-fallback parsers only claim content whose header line contains their
/// delimiter; the fallback parser accepts any header (a one-column table is
/// still a table).
#[derive(Debug, Clone, Copy)]
pub struct DelimitedParser {
    name: &'static str,
    delimiter: u8,
    fallback: bool,
}

impl DelimitedParser {
    pub const fn comma() -> Self {
        Self {
            name: "CSV",
            delimiter: b',',
            fallback: true,
        }
    }

    pub const fn semicolon() -> Self {
        Self {
            name: "SEMICOLON",
            delimiter: b';',
            fallback: false,
        }
    }

    pub const fn tab() -> Self {
        Self {
            name: "TSV",
            delimiter: b'\t',
            fallback: false,
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter as char
    }

    fn empty_table(&self) -> RawTable {
        RawTable {
            format: self.name,
            ..RawTable::default()
        }
    }
}

impl Default for DelimitedParser {
    fn default() -> Self {
        Self::comma()
    }
}

impl TableParser for DelimitedParser {
    fn name(&self) -> &'static str {
        self.name
    }

    fn parse(&self, content: &str) -> Result<RawTable, ParserError> {
        let content = strip_bom(content);
        let Some(header) = header_line(content) else {
            return Ok(self.empty_table());
        };

        if !self.fallback && !header.contains(self.delimiter()) {
            return Err(ParserError::FormatMismatch {
                parser: self.name,
                reason: format!("header line does not contain '{}'", self.delimiter.escape_ascii()),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();

        let header = loop {
            match records.next() {
                None => return Ok(self.empty_table()),
                Some(record) => {
                    let record = record.map_err(|err| ParserError::Csv {
                        parser: self.name,
                        source: err,
                    })?;
                    if !is_blank_record(&record) {
                        break record;
                    }
                }
            }
        };
        let headers: Vec<String> = header.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in records {
            let record = record.map_err(|err| ParserError::Csv {
                parser: self.name,
                source: err,
            })?;
            if is_blank_record(&record) {
                continue;
            }

            let line_index = record
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(rows.len() + 2);

            if record.len() > headers.len() {
                return Err(ParserError::DataRow {
                    parser: self.name,
                    line_index,
                    message: format!(
                        "expected at most {} columns but found {}",
                        headers.len(),
                        record.len()
                    ),
                });
            }

            let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
            cells.resize(headers.len(), String::new());
            rows.push(cells);
        }

        Ok(RawTable {
            content_hash: String::new(),
            format: self.name,
            headers,
            rows,
        })
    }
}
