//! Tabular query results

use serde::{Deserialize, Serialize};

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name
    pub name: String,
    /// Column type as reported by the server (e.g. `VARCHAR`, `BIGINT`)
    #[serde(default)]
    pub column_type: String,
}

impl Field {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
        }
    }
}

/// Result of a statement. Cells are text, `None` is SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub rows_affected: u64,
    #[serde(default)]
    pub insert_id: u64,
    #[serde(default)]
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryResult {
    /// Creates an empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Result with the given columns and rows.
    pub fn with_rows(fields: Vec<Field>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self {
            fields,
            rows,
            ..Default::default()
        }
    }

    /// Returns true if no rows were returned
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Cell at `row` in the column called `name`, `None` for NULL or out of range.
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let column = self.column_index(name)?;
        self.rows.get(row)?.get(column)?.as_deref()
    }
}
