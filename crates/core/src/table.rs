//! Backend-agnostic tabular query results.
//!
//! A [`Table`] is what a [`crate::QueryExecutor`] hands back: column names
//! in query order plus rows of loosely-typed cells. Accessors coerce where
//! SQLite's storage classes blur (an integer-stored numeric reads as real).

use std::collections::HashMap;

/// A single cell value as stored by the warehouse.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a float; integer-stored numerics coerce.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// One result row, keyed by column name.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Builder-style `set`, for test fixtures and seed data.
    pub fn with(mut self, column: impl Into<String>, value: Value) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Text content of a column; `None` for missing, null, or non-text cells.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Numeric content of a column; integers coerce to float.
    pub fn real(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_real)
    }

    pub fn integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_integer)
    }
}

/// An ordered set of rows with their column names.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text values of the first column, nulls skipped. Convenience for
    /// single-column option queries.
    pub fn first_column_text(&self) -> Vec<String> {
        let Some(column) = self.columns.first() else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.text(column).map(str::to_string))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_cells_coerce_to_real() {
        let row = Row::new().with("count", Value::Integer(7));
        assert_eq!(row.real("count"), Some(7.0));
        assert_eq!(row.integer("count"), Some(7));
    }

    #[test]
    fn null_and_missing_cells_read_as_none() {
        let row = Row::new().with("breed_group", Value::Null);
        assert_eq!(row.text("breed_group"), None);
        assert_eq!(row.text("no_such_column"), None);
        assert!(row.get("breed_group").is_some_and(Value::is_null));
    }

    #[test]
    fn first_column_text_skips_nulls() {
        let mut table = Table::new(["size_category"]);
        table.push(Row::new().with("size_category", Value::text("Small")));
        table.push(Row::new().with("size_category", Value::Null));
        table.push(Row::new().with("size_category", Value::text("Large")));
        assert_eq!(table.first_column_text(), vec!["Small", "Large"]);
    }

    #[test]
    fn empty_table_has_no_first_column() {
        assert!(Table::default().first_column_text().is_empty());
    }
}
