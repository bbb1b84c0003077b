use csv::StringRecord;

const BOM: char = '\u{feff}';

pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix(BOM).unwrap_or(content)
}

/// First line that carries anything besides whitespace.
pub(crate) fn header_line(content: &str) -> Option<&str> {
    content.lines().find(|line| !line.trim().is_empty())
}

pub(crate) fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}
