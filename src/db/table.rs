//! Disconnected result containers.
//!
//! A `Table` is fully materialized: once built it holds no reference to the
//! statement or connection that produced it. A `ResultSet` is an ordered
//! collection of named tables.

use serde::Serialize;

use super::value::{ColumnType, Value};

/// Name given to the first table of a filled result set.
pub const DEFAULT_TABLE_NAME: &str = "Table";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    #[serde(skip_serializing_if = "String::is_empty")]
    name: String,
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from raw column names and rows.
    ///
    /// Duplicate column names get a numeric suffix (`name1`, `name2`, ...).
    /// Each column's type comes from its first non-null value. Rows shorter
    /// than the column list are padded with nulls.
    pub fn new(column_names: Vec<String>, mut rows: Vec<Vec<Value>>) -> Self {
        let names = unique_names(column_names);
        for row in &mut rows {
            row.resize(names.len(), Value::Null);
        }

        let columns = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| Column {
                name,
                column_type: rows
                    .iter()
                    .map(|row| &row[idx])
                    .find(|value| !value.is_null())
                    .map(Value::column_type)
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            name: String::new(),
            columns,
            rows,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    pub fn row(&self, idx: usize) -> Option<RowRef<'_>> {
        self.rows.get(idx).map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    /// Value at `row` for the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|values| &values[col])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row viewed as a mapping from column name to value, in column order.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [Column],
    values: &'a [Value],
}

impl<'a> RowRef<'a> {
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c.name == column)
            .map(|idx| &self.values[idx])
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + 'a {
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .zip(self.values.iter())
    }
}

fn unique_names(names: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let candidate = if unique.contains(&name) {
            (1..)
                .map(|n| format!("{}{}", name, n))
                .find(|c| !unique.contains(c))
                .unwrap_or_default()
        } else {
            name
        };
        unique.push(candidate);
    }
    unique
}

/// In-memory, fully disconnected collection of named tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    tables: Vec<Table>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. Unnamed tables are named `Table`, `Table1`, `Table2`, ...
    /// in insertion order; a name already in use gets a numeric suffix.
    pub fn push(&mut self, table: Table) -> &Table {
        let base = if table.name.is_empty() {
            DEFAULT_TABLE_NAME.to_string()
        } else {
            table.name.clone()
        };
        let name = if self.table(&base).is_none() {
            base
        } else {
            (1..)
                .map(|n| format!("{}{}", base, n))
                .find(|c| self.table(c).is_none())
                .unwrap_or_default()
        };
        self.tables.push(table.with_name(name));
        &self.tables[self.tables.len() - 1]
    }

    /// Append every table from another set, e.g. a set filled by a later call.
    pub fn merge(&mut self, other: ResultSet) {
        for table in other.tables {
            self.push(table);
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn into_tables(self) -> Vec<Table> {
        self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
