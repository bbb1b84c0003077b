// crates/shopdash-core/src/schema.rs

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::warn;

/// How a source column's cells are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Category,
    Identifier,
    Integer,
    Decimal,
    Date,
    Time,
    /// Computed from another field, never read from the source.
    Derived,
}

/// Semantic fields a transaction table may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    OrderId,
    Branch,
    City,
    CustomerType,
    Gender,
    ProductLine,
    Product,
    CustomerId,
    UnitPrice,
    Quantity,
    Tax,
    Total,
    Date,
    Time,
    Payment,
    Cogs,
    GrossIncome,
    Rating,
    DayOfWeek,
    MonthName,
}

impl Field {
    pub const ALL: [Field; 20] = [
        Field::OrderId,
        Field::Branch,
        Field::City,
        Field::CustomerType,
        Field::Gender,
        Field::ProductLine,
        Field::Product,
        Field::CustomerId,
        Field::UnitPrice,
        Field::Quantity,
        Field::Tax,
        Field::Total,
        Field::Date,
        Field::Time,
        Field::Payment,
        Field::Cogs,
        Field::GrossIncome,
        Field::Rating,
        Field::DayOfWeek,
        Field::MonthName,
    ];

    /// Canonical keys accepted for this field, in priority order. The first
    /// entry is the key reported when the field is missing.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::OrderId => &["order id", "invoice id"],
            Field::Branch => &["branch"],
            Field::City => &["city"],
            Field::CustomerType => &["customer type"],
            Field::Gender => &["gender"],
            Field::ProductLine => &["product line"],
            Field::Product => &["product"],
            Field::CustomerId => &["customer id"],
            Field::UnitPrice => &["unit price"],
            Field::Quantity => &["quantity"],
            Field::Tax => &["tax 5%", "tax"],
            Field::Total => &["total"],
            Field::Date => &["date"],
            Field::Time => &["time"],
            Field::Payment => &["payment", "payment method"],
            Field::Cogs => &["cogs"],
            Field::GrossIncome => &["gross income"],
            Field::Rating => &["rating"],
            Field::DayOfWeek => &["day of week"],
            Field::MonthName => &["month"],
        }
    }

    pub fn canonical_key(&self) -> &'static str {
        self.aliases()[0]
    }

    /// Column name used inside the normalized dataset.
    pub fn column_name(&self) -> &'static str {
        match self {
            Field::OrderId => "order_id",
            Field::Branch => "branch",
            Field::City => "city",
            Field::CustomerType => "customer_type",
            Field::Gender => "gender",
            Field::ProductLine => "product_line",
            Field::Product => "product",
            Field::CustomerId => "customer_id",
            Field::UnitPrice => "unit_price",
            Field::Quantity => "quantity",
            Field::Tax => "tax",
            Field::Total => "total",
            Field::Date => "date",
            Field::Time => "time",
            Field::Payment => "payment",
            Field::Cogs => "cogs",
            Field::GrossIncome => "gross_income",
            Field::Rating => "rating",
            Field::DayOfWeek => "day_of_week",
            Field::MonthName => "month",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Branch
            | Field::City
            | Field::CustomerType
            | Field::Gender
            | Field::ProductLine
            | Field::Product
            | Field::Payment => FieldKind::Category,
            Field::OrderId | Field::CustomerId => FieldKind::Identifier,
            Field::Quantity => FieldKind::Integer,
            Field::UnitPrice
            | Field::Tax
            | Field::Total
            | Field::Cogs
            | Field::GrossIncome
            | Field::Rating => FieldKind::Decimal,
            Field::Date => FieldKind::Date,
            Field::Time => FieldKind::Time,
            Field::DayOfWeek | Field::MonthName => FieldKind::Derived,
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self.kind(),
            FieldKind::Category | FieldKind::Identifier | FieldKind::Derived
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_key())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.canonical_key())
    }
}

/// Trims and lower-cases a header identifier.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Clone)]
struct FieldEntry {
    key: String,
    original: String,
    column_index: usize,
}

/// Canonical key -> original column identifier, built once per load.
///
/// When two headers normalize to the same key the first one wins and the
/// later ones are recorded in `dropped_duplicates`.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    entries: Vec<FieldEntry>,
    index: HashMap<String, usize>,
    dropped_duplicates: Vec<String>,
}

impl FieldMap {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut map = FieldMap::default();

        for (column_index, header) in headers.iter().enumerate() {
            let original = header.as_ref();
            let key = normalize_key(original);
            if map.index.contains_key(&key) {
                warn!(header = original, key = %key, "duplicate header ignored");
                map.dropped_duplicates.push(original.to_string());
                continue;
            }
            map.index.insert(key.clone(), map.entries.len());
            map.entries.push(FieldEntry {
                key,
                original: original.to_string(),
                column_index,
            });
        }

        map
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.index.contains_key(&normalize_key(key))
    }

    /// Original column identifier for a canonical key.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|entry| entry.original.as_str())
    }

    /// Position of the column in the source table.
    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.entry(key).map(|entry| entry.column_index)
    }

    /// Source column position backing a semantic field, trying its aliases
    /// in order. Derived fields never resolve.
    pub fn resolve(&self, field: Field) -> Option<usize> {
        if field.kind() == FieldKind::Derived {
            return None;
        }
        field
            .aliases()
            .iter()
            .find_map(|alias| self.column_index(alias))
    }

    /// Header text of the column backing `field`, as written in the source.
    pub fn source_header(&self, field: Field) -> Option<&str> {
        if field.kind() == FieldKind::Derived {
            return None;
        }
        field.aliases().iter().find_map(|alias| self.field(alias))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dropped_duplicates(&self) -> &[String] {
        &self.dropped_duplicates
    }

    fn entry(&self, key: &str) -> Option<&FieldEntry> {
        self.index
            .get(&normalize_key(key))
            .map(|&position| &self.entries[position])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_ignores_case_and_outer_whitespace() {
        let map = FieldMap::from_headers(&["  Product Line ", "TOTAL"]);

        assert!(map.has_field("product line"));
        assert!(map.has_field("Product Line"));
        assert_eq!(map.field("total"), Some("TOTAL"));
        assert_eq!(map.resolve(Field::ProductLine), Some(0));
    }

    #[test]
    fn first_duplicate_wins() {
        let map = FieldMap::from_headers(&["Branch", "city", " BRANCH"]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.field("branch"), Some("Branch"));
        assert_eq!(map.column_index("branch"), Some(0));
        assert_eq!(map.dropped_duplicates(), &[" BRANCH".to_string()]);
    }

    #[test]
    fn canonical_headers_are_a_fixed_point() {
        let raw = FieldMap::from_headers(&[" Invoice ID", "Gross Income ", "rating"]);
        let canonical: Vec<String> = raw.keys().map(str::to_string).collect();
        let again = FieldMap::from_headers(&canonical);

        assert_eq!(again.keys().collect::<Vec<_>>(), raw.keys().collect::<Vec<_>>());
        for key in again.keys() {
            assert_eq!(again.field(key), Some(key));
        }
    }

    #[test]
    fn aliases_resolve_in_priority_order() {
        let map = FieldMap::from_headers(&["Tax", "Tax 5%", "Invoice ID"]);

        assert_eq!(map.resolve(Field::Tax), Some(1));
        assert_eq!(map.resolve(Field::OrderId), Some(2));
        assert_eq!(map.resolve(Field::CustomerId), None);
        assert_eq!(map.source_header(Field::Tax), Some("Tax 5%"));
        assert_eq!(map.source_header(Field::OrderId), Some("Invoice ID"));
    }

    #[test]
    fn derived_fields_never_come_from_headers() {
        let map = FieldMap::from_headers(&["Month"]);

        assert!(map.has_field("month"));
        assert_eq!(map.resolve(Field::MonthName), None);
    }
}
