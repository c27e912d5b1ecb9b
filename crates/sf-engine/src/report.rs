//! Outcome of a run.

use crate::error::EngineError;
use serde::Serialize;
use sf_core::{Direction, Tag};

/// Why a selected delta did not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Forward run: the tag is already in the ledger
    AlreadyApplied,
    /// Rollback: the tag is not in the ledger
    NotApplied,
    /// The body holds only comments and whitespace
    PrunedNoOp,
    /// Post run: the ledger has no pending post entry for the tag
    MissingLedgerLink,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::AlreadyApplied => "already applied",
            SkipReason::NotApplied => "not applied",
            SkipReason::PrunedNoOp => "no-op",
            SkipReason::MissingLedgerLink => "no pending ledger entry",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedDelta {
    pub tag: Tag,
    pub reason: SkipReason,
}

/// Result of one up, down or post run.
///
/// `applied` lists the tags whose body executed successfully, in execution
/// order. A failure during execution or while updating the ledger is kept in
/// `failure`; everything in `applied` ran regardless.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub direction: Direction,
    pub dry_run: bool,
    /// Execution order after filtering and pruning
    pub planned: Vec<Tag>,
    pub applied: Vec<Tag>,
    pub skipped: Vec<SkippedDelta>,
    #[serde(skip)]
    pub failure: Option<EngineError>,
}

impl RunReport {
    pub fn new(direction: Direction, dry_run: bool) -> Self {
        Self {
            direction,
            dry_run,
            planned: Vec::new(),
            applied: Vec::new(),
            skipped: Vec::new(),
            failure: None,
        }
    }

    pub(crate) fn skip(&mut self, tag: Tag, reason: SkipReason) {
        self.skipped.push(SkippedDelta { tag, reason });
    }

    /// Tags skipped for `reason`.
    pub fn skipped_for(&self, reason: SkipReason) -> Vec<Tag> {
        self.skipped
            .iter()
            .filter(|s| s.reason == reason)
            .map(|s| s.tag)
            .collect()
    }
}
