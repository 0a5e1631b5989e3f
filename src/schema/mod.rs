//! Schema types consumed by the daemon contract
//!
//! - `SchemaDefinition` / `TableDefinition`: what a database looks like,
//!   with table filtering
//! - `SchemaChange` / `SchemaChangeResult`: a DDL change and its effect

mod change;
mod definition;
mod errors;

pub use change::{SchemaChange, SchemaChangeResult};
pub use definition::{SchemaDefinition, TableDefinition, TableType};
pub use errors::{SchemaError, SchemaResult};
