//! Error types for sf-engine

use sf_core::{CoreError, Direction, Tag};
use sf_db::DbError;
use thiserror::Error;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Catalog, selection or configuration failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database or ledger failure outside of delta execution
    #[error(transparent)]
    Db(#[from] DbError),

    /// A delta body failed to execute (X001)
    #[error("[X001] {direction} delta {tag} failed: {source}")]
    DeltaFailed {
        tag: Tag,
        direction: Direction,
        #[source]
        source: DbError,
    },

    /// Deltas ran but the ledger could not be updated (X002)
    #[error(
        "[X002] Ledger update failed, the database and the ledger have diverged: {ledger}; {}",
        describe_execution(.execution)
    )]
    LedgerDivergence {
        ledger: DbError,
        execution: Option<Box<EngineError>>,
    },

    /// Forward run with nothing left to apply (X003)
    #[error("[X003] Nothing to apply: no unapplied up deltas match the selection")]
    NothingToApply,

    /// Rollback of the last delta with an empty ledger (X004)
    #[error("[X004] Nothing to roll back: the ledger has no applied deltas")]
    EmptyLedger,

    /// Rollback of the last delta without its down file (X005)
    #[error("[X005] No down delta found for the last applied tag {tag}")]
    MissingDownDelta { tag: Tag },

    /// The cancel flag was raised before the next delta (X006)
    #[error("[X006] Run cancelled after {completed} delta(s); remaining deltas were not run")]
    Cancelled { completed: usize },
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;

fn describe_execution(execution: &Option<Box<EngineError>>) -> String {
    match execution {
        Some(err) => format!("execution also failed: {err}"),
        None => "every executed delta succeeded".to_string(),
    }
}
