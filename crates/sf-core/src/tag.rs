//! Delta tag: the integer version parsed from a delta filename.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width used when rendering a tag as a filename prefix.
pub const TAG_WIDTH: usize = 3;

/// Integer version identifier of a delta.
///
/// Tags compare numerically, so `004` and `4` are the same tag. The padded
/// form produced by [`Display`](fmt::Display) is for filenames and output only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(u32);

impl Tag {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    /// The tag immediately after this one, or `None` on overflow.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Parse a tag as typed by a user or found in a filename.
    ///
    /// Accepts ASCII digits only, with or without leading zeros. Signs,
    /// whitespace and empty input are rejected.
    pub fn parse(raw: &str) -> Result<Self, TagParseError> {
        if raw.is_empty() {
            return Err(TagParseError::Empty);
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TagParseError::NotNumeric);
        }
        raw.parse::<u32>()
            .map(Self)
            .map_err(|_| TagParseError::OutOfRange)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = TAG_WIDTH)
    }
}

impl FromStr for Tag {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u32> for Tag {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for Tag {
    type Error = TagParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| TagParseError::OutOfRange)
    }
}

/// Why a string could not be turned into a [`Tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagParseError {
    Empty,
    NotNumeric,
    OutOfRange,
}

impl fmt::Display for TagParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagParseError::Empty => write!(f, "tag is empty"),
            TagParseError::NotNumeric => write!(f, "tag must contain digits only"),
            TagParseError::OutOfRange => write!(f, "tag is out of range"),
        }
    }
}

impl std::error::Error for TagParseError {}

#[cfg(test)]
#[path = "tag_test.rs"]
mod tests;
