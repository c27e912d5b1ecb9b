//! Per-run engine options.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// Clones observe the same flag. The executor checks it before each delta;
/// raising it never interrupts a statement already running.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options that shape a run without changing what is selected
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Resolve, filter and order, but execute and persist nothing
    pub dry_run: bool,
    /// Drop deltas whose body holds only comments and whitespace
    pub prune_no_ops: bool,
    pub cancel: CancelFlag,
}
