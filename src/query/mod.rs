//! Query result values returned by fetch operations

mod result;

pub use result::{Field, QueryResult};
