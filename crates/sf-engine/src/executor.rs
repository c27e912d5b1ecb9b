//! Run pipeline: resolve, filter, order, apply, persist.
//!
//! Deltas run one at a time on a single connection. Each body commits on its
//! own; the first failure stops the run and only the deltas that succeeded
//! before it reach the ledger.

use crate::error::{EngineError, EngineResult};
use crate::options::RunOptions;
use crate::post::reconcile_post;
use crate::prune::prune_no_ops;
use crate::report::{RunReport, SkipReason};
use sf_core::{Delta, DeltaCatalog, Direction, Selection, Tag};
use sf_db::{Database, DbResult, Ledger};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Applies deltas from one catalog to one database
pub struct Executor {
    db: Arc<dyn Database>,
    ledger: Ledger,
    catalog: DeltaCatalog,
    options: RunOptions,
}

impl Executor {
    pub fn new(
        db: Arc<dyn Database>,
        ledger: Ledger,
        catalog: DeltaCatalog,
        options: RunOptions,
    ) -> Self {
        Self {
            db,
            ledger,
            catalog,
            options,
        }
    }

    /// Apply selected up deltas that are not yet in the ledger, oldest first.
    ///
    /// Fails with [`EngineError::NothingToApply`] when no unapplied up delta
    /// matches the selection.
    pub async fn up(&self, selection: &Selection) -> EngineResult<RunReport> {
        let direction = Direction::Up;
        selection.validate_for(direction)?;

        let applied = self.ledger.applied_tags().await?;
        let mut report = RunReport::new(direction, self.options.dry_run);
        let mut batch = self
            .catalog
            .load(direction, |tag| selection.retains(direction, tag))?;

        batch.retain(|tag, _| {
            if applied.contains(tag) {
                log::warn!("Skipping up delta {}: already applied", tag);
                report.skip(*tag, SkipReason::AlreadyApplied);
                false
            } else {
                true
            }
        });
        if batch.is_empty() {
            return Err(EngineError::NothingToApply);
        }

        self.run(batch, report).await
    }

    /// Roll back selected deltas that are in the ledger, newest first.
    ///
    /// [`Selection::LastOnly`] rolls back the highest applied tag only.
    pub async fn down(&self, selection: &Selection) -> EngineResult<RunReport> {
        let direction = Direction::Down;
        selection.validate_for(direction)?;

        let applied = self.ledger.applied_tags().await?;
        let last_only = matches!(selection, Selection::LastOnly);
        let selection = if last_only {
            Selection::resolve_last(&applied).ok_or(EngineError::EmptyLedger)?
        } else {
            selection.clone()
        };

        let mut report = RunReport::new(direction, self.options.dry_run);
        let mut batch = self
            .catalog
            .load(direction, |tag| selection.retains(direction, tag))?;

        if last_only && batch.is_empty() {
            if let Some(tag) = applied.last() {
                return Err(EngineError::MissingDownDelta { tag: *tag });
            }
        }

        batch.retain(|tag, _| {
            if applied.contains(tag) {
                true
            } else {
                log::warn!("Skipping down delta {}: not applied", tag);
                report.skip(*tag, SkipReason::NotApplied);
                false
            }
        });

        self.run(batch, report).await
    }

    /// Run selected post deltas whose ledger entry is pending, oldest first.
    ///
    /// With `force`, post deltas whose tag has no ledger entry run as well.
    pub async fn post(&self, selection: &Selection, force: bool) -> EngineResult<RunReport> {
        let direction = Direction::Post;
        selection.validate_for(direction)?;

        let statuses = self.ledger.post_statuses().await?;
        let mut report = RunReport::new(direction, self.options.dry_run);
        let mut batch = self
            .catalog
            .load(direction, |tag| selection.retains(direction, tag))?;

        let plan = reconcile_post(&statuses, batch.keys().copied(), force);
        batch.retain(|tag, _| plan.eligible.contains(tag));
        report.skipped.extend(plan.skipped);

        self.run(batch, report).await
    }

    /// Prune, order and execute a filtered batch, then persist the successes.
    async fn run(
        &self,
        mut batch: BTreeMap<Tag, Delta>,
        mut report: RunReport,
    ) -> EngineResult<RunReport> {
        let direction = report.direction;

        if self.options.prune_no_ops {
            for tag in prune_no_ops(&mut batch).await {
                report.skip(tag, SkipReason::PrunedNoOp);
            }
        }

        let mut ordered: Vec<Delta> = batch.into_values().collect();
        if direction.is_reverse() {
            ordered.reverse();
        }
        report.planned = ordered.iter().map(|d| d.tag).collect();

        if ordered.is_empty() {
            log::info!("No {} deltas to run", direction);
            return Ok(report);
        }
        if self.options.dry_run {
            log::info!(
                "Dry run: would run {} {} delta(s)",
                ordered.len(),
                direction
            );
            return Ok(report);
        }

        log::info!("Running {} {} delta(s)", ordered.len(), direction);
        let (succeeded, execution) = self.apply(direction, ordered).await;
        report.applied = succeeded.iter().map(|d| d.tag).collect();

        report.failure = match self.persist(direction, &succeeded).await {
            Ok(()) => execution,
            Err(ledger) => {
                log::error!(
                    "Ledger update failed after {} {} delta(s)",
                    succeeded.len(),
                    direction
                );
                Some(EngineError::LedgerDivergence {
                    ledger,
                    execution: execution.map(Box::new),
                })
            }
        };
        Ok(report)
    }

    /// Execute deltas in order until one fails or the run is cancelled.
    async fn apply(
        &self,
        direction: Direction,
        ordered: Vec<Delta>,
    ) -> (Vec<Delta>, Option<EngineError>) {
        let mut succeeded = Vec::with_capacity(ordered.len());
        for delta in ordered {
            if self.options.cancel.is_cancelled() {
                log::warn!("Run cancelled before {} delta {}", direction, delta.tag);
                let completed = succeeded.len();
                return (succeeded, Some(EngineError::Cancelled { completed }));
            }

            log::debug!("Executing {}", delta.path.display());
            match self.db.execute_batch(&delta.sql).await {
                Ok(()) => {
                    log::info!("Applied {} delta {} {}", direction, delta.tag, delta.name);
                    succeeded.push(delta);
                }
                Err(source) => {
                    log::error!("{} delta {} failed: {}", direction, delta.tag, source);
                    let failure = EngineError::DeltaFailed {
                        tag: delta.tag,
                        direction,
                        source,
                    };
                    return (succeeded, Some(failure));
                }
            }
        }
        (succeeded, None)
    }

    /// One ledger statement covering every successful delta.
    async fn persist(&self, direction: Direction, succeeded: &[Delta]) -> DbResult<()> {
        match direction {
            Direction::Up => {
                let entries: Vec<_> = succeeded.iter().map(|d| (d.tag, d.post_status)).collect();
                self.ledger.record_applied(&entries).await
            }
            Direction::Down => {
                let tags: Vec<_> = succeeded.iter().map(|d| d.tag).collect();
                self.ledger.remove(&tags).await
            }
            Direction::Post => {
                let tags: Vec<_> = succeeded.iter().map(|d| d.tag).collect();
                self.ledger.mark_post_applied(&tags).await
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
