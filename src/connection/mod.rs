//! Connection collaborators of the daemon contract
//!
//! Pool internals and the wire protocol live elsewhere; this module only
//! defines the handles the contract hands out.

mod params;
mod pool;
mod timings;

pub use params::ConnParams;
pub use pool::{AppConnectionFactory, DbConnection, PoolConnection};
pub use timings::{TimingStat, Timings};
