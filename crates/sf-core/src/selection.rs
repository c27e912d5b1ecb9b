//! Delta selection: range bounds, cherry-picked tags, or the last applied tag.
//!
//! The meaning of the range bounds depends on the direction of the run:
//!
//! - **up / post**: `from` is the inclusive *lower* bound, `to` the inclusive
//!   *upper* bound.
//! - **down**: rollback walks tags newest-first, so `from` is the inclusive
//!   *upper* bound (where rollback starts) and `to` the inclusive *lower*
//!   bound (where it stops).
//!
//! `sf down --from 5 --to 3` therefore rolls back 5, 4 and 3, while
//! `sf up --from 3 --to 5` applies 3, 4 and 5.

use crate::delta::Direction;
use crate::error::{CoreError, CoreResult};
use crate::tag::Tag;
use std::collections::BTreeSet;

/// Selection flags exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSelection {
    pub from: Option<String>,
    pub to: Option<String>,
    pub cherry_pick: Vec<String>,
}

impl RawSelection {
    /// True when no selection flag was given.
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.cherry_pick.is_empty()
    }

    /// Validate and type the flags for a run in `direction`.
    ///
    /// Fails before any I/O when range and cherry-pick flags are mixed or a
    /// value is not a tag. A rollback with no flags resolves to
    /// [`Selection::LastOnly`].
    pub fn resolve(&self, direction: Direction) -> CoreResult<Selection> {
        if !self.cherry_pick.is_empty() && (self.from.is_some() || self.to.is_some()) {
            return Err(CoreError::ConflictingSelection);
        }

        if direction == Direction::Down && self.is_empty() {
            return Ok(Selection::LastOnly);
        }

        if !self.cherry_pick.is_empty() {
            let mut tags = BTreeSet::new();
            for raw in &self.cherry_pick {
                let tag = Tag::parse(raw.trim()).map_err(|e| CoreError::InvalidCherryTag {
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                tags.insert(tag);
            }
            return Ok(Selection::CherryPick(tags));
        }

        let from = self
            .from
            .as_deref()
            .map(|raw| {
                Tag::parse(raw.trim()).map_err(|e| CoreError::InvalidFromTag {
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;
        let to = self
            .to
            .as_deref()
            .map(|raw| {
                Tag::parse(raw.trim()).map_err(|e| CoreError::InvalidToTag {
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Selection::Range { from, to })
    }
}

/// A validated selection of delta tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Contiguous range; `None` is unbounded on that side. See the module
    /// docs for how `from`/`to` swap roles on rollback.
    Range { from: Option<Tag>, to: Option<Tag> },
    /// Explicit set of tags; range bounds do not apply.
    CherryPick(BTreeSet<Tag>),
    /// Only the highest tag currently recorded in the ledger (rollback only).
    LastOnly,
}

impl Selection {
    /// Every tag.
    pub fn all() -> Self {
        Selection::Range {
            from: None,
            to: None,
        }
    }

    /// Whether `tag` is selected for a run in `direction`.
    ///
    /// [`Selection::LastOnly`] cannot be answered without the ledger and
    /// retains nothing here; resolve it with [`Selection::resolve_last`] first.
    pub fn retains(&self, direction: Direction, tag: Tag) -> bool {
        match self {
            Selection::CherryPick(tags) => tags.contains(&tag),
            Selection::LastOnly => false,
            Selection::Range { from, to } => {
                let (lower, upper) = if direction.is_reverse() {
                    (*to, *from)
                } else {
                    (*from, *to)
                };
                lower.map_or(true, |l| tag >= l) && upper.map_or(true, |u| tag <= u)
            }
        }
    }

    /// Turn [`Selection::LastOnly`] into a single-tag cherry-pick of the
    /// highest applied tag. Returns `None` when nothing is applied.
    pub fn resolve_last(applied: &BTreeSet<Tag>) -> Option<Selection> {
        applied
            .last()
            .map(|tag| Selection::CherryPick(BTreeSet::from([*tag])))
    }

    /// Reject selections that make no sense for `direction`.
    pub fn validate_for(&self, direction: Direction) -> CoreResult<()> {
        if matches!(self, Selection::LastOnly) && direction != Direction::Down {
            return Err(CoreError::LastOnlyNotAllowed {
                direction: direction.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
