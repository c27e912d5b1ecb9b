//! Delta catalog: discovers delta files in the deltas directory.
//!
//! Files are named `<tag>_<name>.<up|down|post>.sql`. Anything else in the
//! directory (the ledger bootstrap file, READMEs, sub-directories) is skipped
//! without complaint, but a matching name whose tag cannot be parsed aborts the
//! scan.

use crate::delta::{Delta, DeltaFileName, Direction, PostStatus};
use crate::error::{CoreError, CoreResult};
use crate::tag::Tag;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

static DELTA_FILE_RE: OnceLock<Regex> = OnceLock::new();

fn delta_file_regex() -> &'static Regex {
    DELTA_FILE_RE.get_or_init(|| {
        Regex::new(r"^(\d+)_([^.]*)\.(up|down|post)\.sql$").expect("valid regex literal")
    })
}

/// Parse a filename into its delta components.
///
/// Returns `None` when the name does not look like a delta at all, and
/// `Some(Err(..))` when it does but the numeric prefix is not a valid tag.
pub fn parse_file_name(file_name: &str) -> Option<CoreResult<DeltaFileName>> {
    let caps = delta_file_regex().captures(file_name)?;
    let raw_tag = &caps[1];
    let tag = match Tag::parse(raw_tag) {
        Ok(tag) => tag,
        Err(e) => {
            return Some(Err(CoreError::MalformedTag {
                file: file_name.to_string(),
                reason: e.to_string(),
            }))
        }
    };
    let stem = format!("{}_{}", raw_tag, &caps[2]);
    DeltaFileName::new(tag, &caps[2], &caps[3], &stem).map(Ok)
}

/// Read-only view over a deltas directory.
#[derive(Debug, Clone)]
pub struct DeltaCatalog {
    dir: PathBuf,
}

impl DeltaCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load every delta of `direction`.
    pub fn scan(&self, direction: Direction) -> CoreResult<BTreeMap<Tag, Delta>> {
        self.load(direction, |_| true)
    }

    /// Load the deltas of `direction` whose tag `retain` accepts.
    ///
    /// File contents are only read for retained tags. For up deltas the
    /// proposed post status is seeded from the presence of a sibling
    /// `.post.sql` file.
    pub fn load<F>(&self, direction: Direction, retain: F) -> CoreResult<BTreeMap<Tag, Delta>>
    where
        F: Fn(Tag) -> bool,
    {
        let mut result: BTreeMap<Tag, Delta> = BTreeMap::new();
        let mut seen: BTreeMap<Tag, PathBuf> = BTreeMap::new();

        for (file_name, path) in self.list_files()? {
            let Some(parsed) = parse_file_name(&file_name) else {
                continue;
            };
            let parsed = parsed?;
            if parsed.direction != direction {
                continue;
            }

            if let Some(existing) = seen.insert(parsed.tag, path.clone()) {
                return Err(CoreError::DuplicateTag {
                    tag: parsed.tag.to_string(),
                    direction: direction.to_string(),
                    first: existing.display().to_string(),
                    second: path.display().to_string(),
                });
            }

            if !retain(parsed.tag) {
                log::debug!("Delta {} ({}) not selected", parsed.tag, file_name);
                continue;
            }

            let sql = std::fs::read_to_string(&path).map_err(|e| CoreError::DeltaUnreadable {
                path: path.display().to_string(),
                source: e,
            })?;

            let post_status = if direction == Direction::Up
                && self.dir.join(parsed.sibling(Direction::Post)).is_file()
            {
                PostStatus::Pending
            } else {
                PostStatus::NoExist
            };

            result.insert(
                parsed.tag,
                Delta {
                    tag: parsed.tag,
                    name: parsed.name,
                    direction,
                    path,
                    sql,
                    post_status,
                },
            );
        }

        Ok(result)
    }

    /// One past the highest tag found in any direction, or `0` when the
    /// directory holds no deltas.
    pub fn next_tag(&self) -> CoreResult<Tag> {
        let mut highest: Option<Tag> = None;
        for (file_name, _) in self.list_files()? {
            if let Some(parsed) = parse_file_name(&file_name) {
                let tag = parsed?.tag;
                highest = Some(highest.map_or(tag, |h| h.max(tag)));
            }
        }

        match highest {
            None => Ok(Tag::new(0)),
            Some(tag) => tag.next().ok_or_else(|| CoreError::MalformedTag {
                file: tag.to_string(),
                reason: "no tag available after the current highest".to_string(),
            }),
        }
    }

    /// Regular files in the directory, sorted by name for stable scans.
    fn list_files(&self) -> CoreResult<Vec<(String, PathBuf)>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| CoreError::DirectoryUnreadable {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::DirectoryUnreadable {
                path: self.dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push((name.to_string(), path.clone()));
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
