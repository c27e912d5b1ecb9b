//! sf-db - Database abstraction layer for Schemaflow
//!
//! This crate provides the `Database` trait the engine runs SQL through, a
//! DuckDB implementation of it, and the `Ledger` that records applied deltas.

pub mod duckdb;
pub mod error;
pub mod ledger;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use ledger::Ledger;
pub use traits::Database;
