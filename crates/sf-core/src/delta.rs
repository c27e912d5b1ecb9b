//! Delta file types shared by the catalog, ledger and engine.

use crate::tag::Tag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Direction of a delta file, taken from its `.up.sql` / `.down.sql` /
/// `.post.sql` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Forward migration
    Up,
    /// Rollback of an up delta
    Down,
    /// Cleanup run after an up delta
    Post,
}

impl Direction {
    /// Suffix between the name and `.sql`.
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Post => "post",
        }
    }

    /// Whether tags are walked newest-first for this direction.
    pub fn is_reverse(self) -> bool {
        matches!(self, Direction::Down)
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "post" => Some(Direction::Post),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Lifecycle of the post delta attached to an up delta.
///
/// Stored as an integer in the ledger's `post_status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// No `.post.sql` existed when the up delta was recorded
    NoExist = 0,
    /// A post delta exists but has not run yet
    Pending = 1,
    /// The post delta has run
    Applied = 2,
}

impl PostStatus {
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(PostStatus::NoExist),
            1 => Some(PostStatus::Pending),
            2 => Some(PostStatus::Applied),
            _ => None,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::NoExist => write!(f, "none"),
            PostStatus::Pending => write!(f, "pending"),
            PostStatus::Applied => write!(f, "applied"),
        }
    }
}

/// Components of a delta filename: `<tag>_<name>.<direction>.sql`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaFileName {
    pub tag: Tag,
    pub name: String,
    pub direction: Direction,
    /// Everything before the first `.`, e.g. `003_add_users`.
    pub stem: String,
}

impl DeltaFileName {
    /// Filename of the sibling delta in another direction.
    pub fn sibling(&self, direction: Direction) -> String {
        format!("{}.{}.sql", self.stem, direction.suffix())
    }

    pub(crate) fn new(tag: Tag, name: &str, suffix: &str, stem: &str) -> Option<Self> {
        Some(Self {
            tag,
            name: name.to_string(),
            direction: Direction::from_suffix(suffix)?,
            stem: stem.to_string(),
        })
    }
}

/// A delta loaded from the catalog.
#[derive(Debug, Clone)]
pub struct Delta {
    pub tag: Tag,
    pub name: String,
    pub direction: Direction,
    pub path: PathBuf,
    /// Raw SQL body
    pub sql: String,
    /// Proposed post status; only meaningful for up deltas.
    pub post_status: PostStatus,
}
