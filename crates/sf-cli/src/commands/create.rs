//! Create command implementation - writes empty delta files at the next tag

use anyhow::{bail, Context, Result};
use serde::Serialize;
use sf_core::{Direction, Tag};
use std::fs;

use crate::cli::{CreateArgs, GlobalArgs, OutputFormat};
use crate::commands::common::load_project;

#[derive(Debug, Serialize)]
struct CreateOutcome {
    tag: Tag,
    files: Vec<String>,
}

/// Execute the create command
pub(crate) async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    validate_name(&args.name)?;
    let project = load_project(global)?;

    let dir = project.deltas_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let tag = project.catalog().next_tag()?;
    let mut directions = vec![Direction::Up, Direction::Down];
    if args.post {
        directions.push(Direction::Post);
    }

    let files: Vec<_> = directions
        .iter()
        .map(|d| {
            let path = dir.join(format!("{}_{}.{}.sql", tag, args.name, d.suffix()));
            (*d, path)
        })
        .collect();

    if let Some((_, existing)) = files.iter().find(|(_, path)| path.exists()) {
        bail!(
            "Refusing to overwrite existing delta file {}",
            existing.display()
        );
    }

    for (direction, path) in &files {
        fs::write(path, template(*direction))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
    }

    let outcome = CreateOutcome {
        tag,
        files: files
            .iter()
            .map(|(_, path)| path.display().to_string())
            .collect(),
    };
    match global.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => {
            for file in &outcome.files {
                println!("Created {}", file);
            }
        }
    }
    Ok(())
}

/// Placeholder body for a new delta file.
fn template(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "-- TODO: Add delta SQL here\n",
        Direction::Down => "-- TODO: Add rollback SQL here\n",
        Direction::Post => "-- TODO: Handle delta cleanup here\n",
    }
}

/// Delta names become part of a file name and must survive the catalog's
/// filename pattern, so only letters, digits, `_` and `-` are allowed.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("Delta name must not be empty");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        bail!(
            "Invalid delta name '{}': use only letters, digits, '_' and '-'",
            name
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
