//! Eligibility of post deltas.

use crate::report::{SkipReason, SkippedDelta};
use sf_core::{PostStatus, Tag};
use std::collections::{BTreeMap, BTreeSet};

/// Which selected post deltas should run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PostPlan {
    pub eligible: BTreeSet<Tag>,
    pub skipped: Vec<SkippedDelta>,
}

/// Decide which post deltas on disk may run.
///
/// `statuses` holds the ledger rows with a non-zero post status. A post
/// delta runs when its row is pending. With `force`, a post delta whose tag
/// has no such row runs as well. Already applied post deltas never run again.
pub fn reconcile_post(
    statuses: &BTreeMap<Tag, PostStatus>,
    on_disk: impl IntoIterator<Item = Tag>,
    force: bool,
) -> PostPlan {
    let mut plan = PostPlan::default();
    for tag in on_disk {
        match statuses.get(&tag) {
            Some(PostStatus::Pending) => {
                plan.eligible.insert(tag);
            }
            Some(PostStatus::Applied) => {
                log::debug!("Post delta {} already applied", tag);
                plan.skipped.push(SkippedDelta {
                    tag,
                    reason: SkipReason::AlreadyApplied,
                });
            }
            Some(PostStatus::NoExist) | None if force => {
                log::warn!("Forcing post delta {} without a pending ledger entry", tag);
                plan.eligible.insert(tag);
            }
            Some(PostStatus::NoExist) | None => {
                log::warn!("Skipping post delta {}: no pending ledger entry", tag);
                plan.skipped.push(SkippedDelta {
                    tag,
                    reason: SkipReason::MissingLedgerLink,
                });
            }
        }
    }
    plan
}

#[cfg(test)]
#[path = "post_test.rs"]
mod tests;
