//! Materialized query results.
//!
//! Queries are materialized into a [`ResultSet`] of [`Row`]s holding owned
//! [`Value`]s. Column metadata is shared across all rows of a result set
//! (one `Arc`, not one copy per row), and rows support both ordinal and
//! case-insensitive name access.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Value;

/// A single materialized row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Column names, shared across the result set.
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row from shared column names and its values.
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Get a value by column ordinal.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a value by column name (case-insensitive).
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        let index = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))?;
        self.values.get(index)
    }

    /// Get the column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the values in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get the number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the row into its values, a columns-by-ordinal container.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Consume the row into a columns-by-name map.
    ///
    /// Column names keep their original casing. Duplicate column names keep
    /// the value of the last duplicate, so prefer ordinal access for result
    /// sets with repeated names.
    #[must_use]
    pub fn into_map(self) -> HashMap<String, Value> {
        self.columns
            .iter()
            .cloned()
            .zip(self.values)
            .collect()
    }
}

/// An ordered, fully materialized query result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Create a result set from column names and rows of values.
    ///
    /// Intended for assembling results by hand (fixtures, adapters); rows
    /// coming from a live query are built by the connection helpers.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let columns: Arc<[String]> = columns.into();
        let rows = rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&columns), values))
            .collect();
        Self { columns, rows }
    }

    /// Assemble a result set from already-shared column names and rows.
    pub(crate) fn from_parts(columns: Arc<[String]>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Get the column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Find a column ordinal by name (case-insensitive).
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Get the rows in result order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume the result set into its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// The value in the first column of the only row.
    ///
    /// Fails with [`Error::NoRows`] on an empty result and
    /// [`Error::MoreThanOneRow`] when more than one row came back.
    pub fn single_value(&self) -> Result<&Value> {
        self.single_row()?
            .get(0)
            .ok_or_else(|| Error::Query("result set has no columns".to_string()))
    }

    /// The only row of the result.
    ///
    /// Fails with [`Error::NoRows`] on an empty result and
    /// [`Error::MoreThanOneRow`] when more than one row came back.
    pub fn single_row(&self) -> Result<&Row> {
        match self.rows.as_slice() {
            [] => Err(Error::NoRows),
            [row] => Ok(row),
            _ => Err(Error::MoreThanOneRow),
        }
    }

    /// The only row of the result, or `None` on an empty result.
    ///
    /// Fails with [`Error::MoreThanOneRow`] when more than one row came
    /// back.
    pub fn single_row_opt(&self) -> Result<Option<&Row>> {
        match self.rows.as_slice() {
            [] => Ok(None),
            [row] => Ok(Some(row)),
            _ => Err(Error::MoreThanOneRow),
        }
    }

    /// All rows of a one-column result, as a flat list of values.
    ///
    /// Fails with [`Error::MoreThanOneColumn`] when the result set has more
    /// than one column.
    pub fn single_column(&self) -> Result<Vec<Value>> {
        if self.columns.len() > 1 {
            return Err(Error::MoreThanOneColumn);
        }
        self.rows
            .iter()
            .map(|row| {
                row.get(0)
                    .cloned()
                    .ok_or_else(|| Error::Query("result set has no columns".to_string()))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
