//! Storage layer for the flotilla control plane.
//!
//! The resource store contract lives in [`NlbStore`]; the SQLite-backed
//! [`SqlNlbStore`] is the durable implementation and [`MemoryNlbStore`]
//! serves tests and ephemeral runs.

mod memory;
pub mod migrations;
mod pool;
mod sql;
mod store;

pub use memory::MemoryNlbStore;
pub use pool::{create_pool, DbPool};
pub use sql::SqlNlbStore;
pub use store::NlbStore;
