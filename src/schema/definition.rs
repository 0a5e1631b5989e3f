//! Schema definition of one database
//!
//! Table and exclude filters are regular expressions matched against the
//! whole table name (`orders` does not match `orders_archive`; `orders.*`
//! does). An empty table filter keeps every table.

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::errors::{SchemaError, SchemaResult};

/// Kind of table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    #[default]
    BaseTable,
    View,
}

/// One table (or view) of a database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name
    pub name: String,
    /// CREATE TABLE / CREATE VIEW statement
    pub schema: String,
    /// Column names in table order
    #[serde(default)]
    pub columns: Vec<String>,
    /// Primary key column names in key order
    #[serde(default)]
    pub primary_key_columns: Vec<String>,
    #[serde(default)]
    pub table_type: TableType,
    /// Approximate on-disk size in bytes
    #[serde(default)]
    pub data_length: u64,
    /// Approximate row count
    #[serde(default)]
    pub row_count: u64,
}

impl TableDefinition {
    /// Create a base table definition.
    pub fn base_table(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            ..Default::default()
        }
    }

    /// Create a view definition.
    pub fn view(name: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            table_type: TableType::View,
            ..Default::default()
        }
    }

    pub fn is_view(&self) -> bool {
        self.table_type == TableType::View
    }
}

/// Schema of one database
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// CREATE DATABASE statement
    #[serde(default)]
    pub database_schema: String,
    #[serde(default)]
    pub table_definitions: Vec<TableDefinition>,
    /// Hash of the table schemas, see [`SchemaDefinition::compute_version`]
    #[serde(default)]
    pub version: String,
}

impl SchemaDefinition {
    /// Build a definition and stamp its version.
    pub fn new(database_schema: impl Into<String>, table_definitions: Vec<TableDefinition>) -> Self {
        let mut definition = Self {
            database_schema: database_schema.into(),
            table_definitions,
            version: String::new(),
        };
        definition.version = definition.compute_version();
        definition
    }

    /// Hex SHA-256 over the table schemas in order.
    pub fn compute_version(&self) -> String {
        let mut hasher = Sha256::new();
        for table in &self.table_definitions {
            hasher.update(table.schema.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Table names in definition order.
    pub fn table_names(&self) -> Vec<&str> {
        self.table_definitions.iter().map(|t| t.name.as_str()).collect()
    }

    /// Look up a table by exact name.
    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.table_definitions.iter().find(|t| t.name == name)
    }

    /// Copy of this schema restricted to the selected tables.
    ///
    /// The version is recomputed when any table was dropped.
    pub fn filter_tables(
        &self,
        tables: &[String],
        exclude_tables: &[String],
        include_views: bool,
    ) -> SchemaResult<SchemaDefinition> {
        let include = compile_filters(tables)?;
        let exclude = compile_filters(exclude_tables)?;

        let kept: Vec<TableDefinition> = self
            .table_definitions
            .iter()
            .filter(|table| include.is_empty() || include.iter().any(|re| re.is_match(&table.name)))
            .filter(|table| !exclude.iter().any(|re| re.is_match(&table.name)))
            .filter(|table| include_views || !table.is_view())
            .cloned()
            .collect();

        let mut filtered = SchemaDefinition {
            database_schema: self.database_schema.clone(),
            table_definitions: kept,
            version: self.version.clone(),
        };
        if filtered.table_definitions.len() != self.table_definitions.len() {
            filtered.version = filtered.compute_version();
        }
        Ok(filtered)
    }
}

fn compile_filters(patterns: &[String]) -> SchemaResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{})$", pattern))
                .map_err(|e| SchemaError::invalid_table_filter(pattern, e.to_string()))
        })
        .collect()
}
