//! Tabular row sets
//!
//! Column sets vary per collection and per response, so a row is a JSON
//! object rather than a fixed record type. Key order is preserved.

use super::schema::json_to_arrow;
use crate::error::Result;
use crate::types::{JsonObject, JsonValue};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single row: column name -> value, in column order
pub type Row = JsonObject;

/// An ordered sequence of rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowSet {
    rows: Vec<Row>,
}

impl RowSet {
    /// Create an empty row set
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing rows
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Append a row
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Append every row of another row set
    pub fn append(&mut self, other: RowSet) {
        self.rows.extend(other.rows);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Take ownership of the rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Iterate over the rows
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Union of all column names, in first-seen order
    pub fn columns(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Values of one column, `None` where a row lacks it
    pub fn column(&self, name: &str) -> Vec<Option<&JsonValue>> {
        self.rows.iter().map(|row| row.get(name)).collect()
    }

    /// Rows as JSON objects
    pub fn to_records(&self) -> Vec<JsonValue> {
        self.rows.iter().cloned().map(JsonValue::Object).collect()
    }

    /// Materialize as an Arrow RecordBatch with an inferred schema
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        json_to_arrow(&self.rows, None)
    }
}

impl IntoIterator for RowSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<Row> for RowSet {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
