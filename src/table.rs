// SPDX-License-Identifier: MIT

//! Tabular import and export
//!
//! A [`Table`] is a small column-oriented record set. A node can fan out
//! one child per distinct value of a column, recursively over every
//! column, and a tree can be flattened back into rows of root-to-leaf
//! paths.

use crate::condition::values_equal;
use crate::error::TreeError;
use crate::tree::{Node, Split};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named columns over rows of values
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Table {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given column headers
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; it must have one value per column
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TreeError> {
        if row.len() != self.columns.len() {
            return Err(TreeError::LengthMismatch {
                field: "row",
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Builder-style [`Table::push_row`]
    pub fn with_row<I, V>(mut self, row: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.push_row(row.into_iter().map(Into::into).collect())?;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Result<usize, TreeError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| TreeError::UnknownColumn(column.to_string()))
    }

    /// Distinct values of a column, in first-seen order
    pub fn distinct(&self, column: &str) -> Result<Vec<Value>, TreeError> {
        let idx = self.column_index(column)?;
        let mut seen: Vec<Value> = Vec::new();
        for row in &self.rows {
            if !seen.iter().any(|v| values_equal(v, &row[idx])) {
                seen.push(row[idx].clone());
            }
        }
        Ok(seen)
    }

    /// Rows whose `column` equals `value`
    pub fn filter_eq(&self, column: &str, value: &Value) -> Result<Table, TreeError> {
        let idx = self.column_index(column)?;
        Ok(Table {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| values_equal(&row[idx], value))
                .cloned()
                .collect(),
        })
    }

    /// Keep only the named columns, in the given order
    pub fn select(&self, columns: &[String]) -> Result<Table, TreeError> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Table {
            columns: columns.to_vec(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Plain form: `{columns: [...], rows: [[...], ...]}`
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "columns": self.columns,
            "rows": self.rows,
        })
    }

    pub fn from_value(value: &Value) -> Result<Table, TreeError> {
        let table: Table = serde_json::from_value(value.clone())?;
        if let Some(row) = table.rows.iter().find(|r| r.len() != table.columns.len()) {
            return Err(TreeError::LengthMismatch {
                field: "row",
                expected: table.columns.len(),
                actual: row.len(),
            });
        }
        Ok(table)
    }
}

impl Node {
    /// One new child per distinct value of `column`.
    ///
    /// Each child is named after the value and holds the matching rows
    /// (as [`Table::to_value`]) as its payload.
    pub fn split_on_column(&mut self, table: &Table, column: &str) -> Result<&[Node], TreeError> {
        let (names, subsets) = partition(table, column)?;
        self.split(
            Split::new(names.len())
                .names(names)
                .values(subsets.iter().map(Table::to_value)),
        )
    }

    /// Build a subtree from a table, one tree level per column.
    ///
    /// The first column fans out under this node; each child then fans out
    /// over the remaining columns of its own rows.
    pub fn extend_from_table(&mut self, table: &Table) -> Result<(), TreeError> {
        let Some((first, rest)) = table.columns().split_first() else {
            return Ok(());
        };

        let (names, subsets) = partition(table, first)?;
        let start = self.child_count();
        self.split(
            Split::new(names.len())
                .names(names)
                .values(subsets.iter().map(Table::to_value)),
        )?;

        for (child, subset) in self.children_mut()[start..].iter_mut().zip(subsets) {
            child.extend_from_table(&subset.select(rest)?)?;
        }
        Ok(())
    }

    /// Flatten root-to-leaf paths into table rows.
    ///
    /// Each row holds `attribute` of the nodes along one path. Rows shorter
    /// than the deepest path are padded with `null`. Without `columns`, the
    /// headers are `0`, `1`, ...
    pub fn to_table(
        &self,
        columns: Option<Vec<String>>,
        ignore_first: bool,
        attribute: &str,
    ) -> Result<Table, TreeError> {
        let skip = usize::from(ignore_first);
        let rows: Vec<Vec<Value>> = self
            .to_attribute_path_list(attribute)
            .into_iter()
            .map(|row| row.into_iter().skip(skip).collect())
            .collect();

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let columns = match columns {
            Some(columns) if columns.len() != width => {
                return Err(TreeError::LengthMismatch {
                    field: "columns",
                    expected: width,
                    actual: columns.len(),
                })
            }
            Some(columns) => columns,
            None => (0..width).map(|i| i.to_string()).collect(),
        };

        let mut table = Table::new(columns);
        for mut row in rows {
            row.resize(width, Value::Null);
            table.push_row(row)?;
        }
        Ok(table)
    }
}

fn partition(table: &Table, column: &str) -> Result<(Vec<Value>, Vec<Table>), TreeError> {
    let names = table.distinct(column)?;
    let subsets = names
        .iter()
        .map(|name| table.filter_eq(column, name))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((names, subsets))
}
