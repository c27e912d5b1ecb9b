//! The ledger table: which deltas are applied and where their post phase stands.
//!
//! One row per applied tag. Rows are inserted after a successful forward run,
//! deleted after a successful rollback, and their `post_status` moves from
//! pending to applied once the post delta has run. Every mutation is a single
//! statement covering the whole batch.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use sf_core::{PostStatus, Tag};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Handle to the ledger table of one project
#[derive(Clone)]
pub struct Ledger {
    db: Arc<dyn Database>,
    table: String,
}

impl Ledger {
    /// The table name must already be a validated identifier.
    pub fn new(db: Arc<dyn Database>, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn exists(&self) -> DbResult<bool> {
        self.db.relation_exists(&self.table).await
    }

    /// Create the ledger table. Returns `true` when it did not exist before.
    pub async fn create_if_missing(&self) -> DbResult<bool> {
        if self.exists().await? {
            return Ok(false);
        }
        self.db
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (
                     tag         BIGINT PRIMARY KEY,
                     post_status INTEGER NOT NULL DEFAULT 0,
                     applied_at  TIMESTAMP NOT NULL DEFAULT now()
                 );",
                self.table
            ))
            .await
            .map_err(|e| self.classify(e))?;
        log::debug!("Created ledger table {}", self.table);
        Ok(true)
    }

    /// All applied tags.
    pub async fn applied_tags(&self) -> DbResult<BTreeSet<Tag>> {
        let rows = self
            .db
            .query_integers(
                &format!("SELECT CAST(tag AS BIGINT) FROM {} ORDER BY tag", self.table),
                1,
            )
            .await
            .map_err(|e| self.classify(e))?;

        rows.into_iter().map(|row| self.tag_from(row[0])).collect()
    }

    /// Post status of every applied tag that has a post delta.
    pub async fn post_statuses(&self) -> DbResult<BTreeMap<Tag, PostStatus>> {
        let rows = self
            .db
            .query_integers(
                &format!(
                    "SELECT CAST(tag AS BIGINT), CAST(post_status AS BIGINT) FROM {} WHERE post_status > 0 ORDER BY tag",
                    self.table
                ),
                2,
            )
            .await
            .map_err(|e| self.classify(e))?;

        let mut statuses = BTreeMap::new();
        for row in rows {
            let tag = self.tag_from(row[0])?;
            let status = PostStatus::from_i64(row[1]).ok_or_else(|| DbError::LedgerCorrupt {
                table: self.table.clone(),
                reason: format!("post_status {} for tag {}", row[1], tag),
            })?;
            statuses.insert(tag, status);
        }
        Ok(statuses)
    }

    /// Record freshly applied deltas with their initial post status.
    pub async fn record_applied(&self, entries: &[(Tag, PostStatus)]) -> DbResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let values = entries
            .iter()
            .map(|(tag, status)| format!("({}, {})", tag.value(), status.as_i64()))
            .collect::<Vec<_>>()
            .join(", ");
        self.db
            .execute(&format!(
                "INSERT INTO {} (tag, post_status) VALUES {}",
                self.table, values
            ))
            .await
            .map_err(|e| self.classify(e))?;
        Ok(())
    }

    /// Drop the rows of rolled-back deltas.
    pub async fn remove(&self, tags: &[Tag]) -> DbResult<()> {
        if tags.is_empty() {
            return Ok(());
        }
        self.db
            .execute(&format!(
                "DELETE FROM {} WHERE tag IN ({})",
                self.table,
                tag_list(tags)
            ))
            .await
            .map_err(|e| self.classify(e))?;
        Ok(())
    }

    /// Mark the post delta of each tag as applied.
    pub async fn mark_post_applied(&self, tags: &[Tag]) -> DbResult<()> {
        if tags.is_empty() {
            return Ok(());
        }
        self.db
            .execute(&format!(
                "UPDATE {} SET post_status = {} WHERE tag IN ({})",
                self.table,
                PostStatus::Applied.as_i64(),
                tag_list(tags)
            ))
            .await
            .map_err(|e| self.classify(e))?;
        Ok(())
    }

    fn tag_from(&self, value: i64) -> DbResult<Tag> {
        Tag::try_from(value).map_err(|e| DbError::LedgerCorrupt {
            table: self.table.clone(),
            reason: format!("tag {value}: {e}"),
        })
    }

    fn classify(&self, err: DbError) -> DbError {
        match err {
            DbError::TableNotFound(_) => DbError::LedgerNotInitialized {
                table: self.table.clone(),
            },
            other => other,
        }
    }
}

fn tag_list(tags: &[Tag]) -> String {
    tags.iter()
        .map(|t| t.value().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
