//! sf-engine - Delta execution engine for Schemaflow
//!
//! Turns a selection into an ordered batch of deltas, optionally prunes
//! comment-only bodies, runs the batch against a database and records the
//! outcome in the ledger.

pub mod error;
pub mod executor;
pub mod options;
pub mod post;
pub mod prune;
pub mod report;

pub use error::{EngineError, EngineResult};
pub use executor::Executor;
pub use options::{CancelFlag, RunOptions};
pub use post::{reconcile_post, PostPlan};
pub use prune::prune_no_ops;
pub use report::{RunReport, SkipReason, SkippedDelta};
