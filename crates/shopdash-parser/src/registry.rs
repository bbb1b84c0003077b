use std::fs;
use std::path::Path;

use blake3::Hasher;

use crate::errors::{ParserAttempt, ParserError};
use crate::formats::DelimitedParser;
use crate::model::RawTable;

pub trait TableParser {
    fn name(&self) -> &'static str;
    fn parse(&self, content: &str) -> Result<RawTable, ParserError>;
}

pub fn parse_table(content: &str) -> Result<RawTable, ParserError> {
    let tab = DelimitedParser::tab();
    let semicolon = DelimitedParser::semicolon();
    let comma = DelimitedParser::comma();
    let parsers: [&dyn TableParser; 3] = [&tab, &semicolon, &comma];

    let mut table = parse_with_parsers(content, &parsers)?;
    table.content_hash = compute_hash(content.as_bytes());
    Ok(table)
}

pub fn parse_with_parsers(
    content: &str,
    parsers: &[&dyn TableParser],
) -> Result<RawTable, ParserError> {
    let mut attempts = Vec::new();

    for parser in parsers {
        match parser.parse(content) {
            Ok(parsed) => return Ok(parsed),
            Err(ParserError::FormatMismatch { reason, .. }) => {
                attempts.push(ParserAttempt::new(parser.name(), reason));
            }
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::NoMatchingParser { attempts })
}

pub fn read_table_file(path: impl AsRef<Path>) -> Result<RawTable, ParserError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ParserError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_table(&content)
}

fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    let hash = hasher.finalize();
    hash.to_hex().to_string()
}
