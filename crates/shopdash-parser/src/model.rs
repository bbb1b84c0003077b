/// A header row plus string cells, exactly as read from the source.
///
/// Every row holds one cell per header; short rows are padded with empty
/// cells by the parser.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub content_hash: String,
    pub format: &'static str,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            content_hash: String::new(),
            format: "",
            headers,
            rows,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Iterates one column top to bottom.
    pub fn column(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |cells| cells.get(column).map(String::as_str).unwrap_or(""))
    }
}
