//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Database abstraction trait for Schemaflow
///
/// The engine treats a backend as an opaque connection that runs SQL text.
/// Statements are issued one at a time; implementations must be Send + Sync
/// for async operation but are never driven concurrently by the engine.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a script of one or more statements (a delta body)
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Run a query whose first `columns` columns are integers and return
    /// them row by row
    async fn query_integers(&self, sql: &str, columns: usize) -> DbResult<Vec<Vec<i64>>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
