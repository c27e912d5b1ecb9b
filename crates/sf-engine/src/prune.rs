//! No-op pruning of a delta batch.

use sf_core::{is_no_op, Delta, Tag};
use std::collections::BTreeMap;

/// Remove every delta whose body is a no-op and return the removed tags in
/// ascending order.
///
/// Each body is classified on its own task. The batch is only modified once
/// every task has been joined. A task that fails to join keeps its delta.
pub async fn prune_no_ops(batch: &mut BTreeMap<Tag, Delta>) -> Vec<Tag> {
    let mut handles = Vec::with_capacity(batch.len());
    for (tag, delta) in batch.iter() {
        let sql = delta.sql.clone();
        let handle = tokio::spawn(async move { is_no_op(&sql) });
        handles.push((*tag, handle));
    }

    // Wait for every classification before touching the batch
    let mut no_ops = Vec::new();
    for (tag, handle) in handles {
        match handle.await {
            Ok(true) => no_ops.push(tag),
            Ok(false) => {}
            Err(e) => log::warn!("No-op check for delta {} failed, keeping it: {}", tag, e),
        }
    }

    for tag in &no_ops {
        if let Some(delta) = batch.remove(tag) {
            log::warn!(
                "Pruned no-op {} delta {} ({})",
                delta.direction,
                tag,
                delta.path.display()
            );
        }
    }
    no_ops
}

#[cfg(test)]
#[path = "prune_test.rs"]
mod tests;
