//! Init command implementation - prepares a project for its first run

use anyhow::{Context, Result};
use serde::Serialize;
use sf_core::config::{CONFIG_FILE_NAME, CONFIG_FILE_NAME_ALT};
use std::fs;
use std::path::Path;

use crate::cli::{GlobalArgs, InitArgs, OutputFormat};
use crate::commands::common::{load_project, open_database};

#[derive(Debug, Serialize)]
struct InitOutcome {
    config_created: bool,
    deltas_dir: String,
    deltas_dir_created: bool,
    ledger_table: String,
    ledger_created: bool,
}

/// Execute the init command
///
/// Writes a default `schemaflow.yml` when the project has none, then creates
/// the deltas directory and the ledger table if they are missing. Running it
/// again changes nothing.
pub(crate) async fn execute(args: &InitArgs, global: &GlobalArgs) -> Result<()> {
    let root = &global.project_dir;
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory: {}", root.display()))?;

    let config_created = write_default_config(root, args.name.as_deref())?;
    let project = load_project(global)?;

    let deltas_dir = project.deltas_dir();
    let deltas_dir_created = !deltas_dir.is_dir();
    if deltas_dir_created {
        fs::create_dir_all(&deltas_dir)
            .with_context(|| format!("Failed to create directory: {}", deltas_dir.display()))?;
    }

    let db = open_database(global, &project)?;
    let ledger = project.ledger(db);
    let ledger_created = ledger
        .create_if_missing()
        .await
        .with_context(|| format!("Failed to create ledger table '{}'", ledger.table()))?;

    let outcome = InitOutcome {
        config_created,
        deltas_dir: deltas_dir.display().to_string(),
        deltas_dir_created,
        ledger_table: ledger.table().to_string(),
        ledger_created,
    };

    match global.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => {
            if outcome.config_created {
                println!("Created {}", root.join(CONFIG_FILE_NAME).display());
            }
            if outcome.deltas_dir_created {
                println!("Created deltas directory {}", outcome.deltas_dir);
            }
            if outcome.ledger_created {
                println!("Created ledger table {}", outcome.ledger_table);
            } else {
                println!("Ledger table {} already exists", outcome.ledger_table);
            }
        }
    }
    Ok(())
}

/// Write `schemaflow.yml` unless a config file is already present.
fn write_default_config(root: &Path, name: Option<&str>) -> Result<bool> {
    if root.join(CONFIG_FILE_NAME).exists() || root.join(CONFIG_FILE_NAME_ALT).exists() {
        return Ok(false);
    }

    let name = match name {
        Some(name) => name.to_string(),
        None => root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "schemaflow".to_string()),
    };
    let safe_name = name.replace('\\', "\\\\").replace('"', "\\\"");
    let content = format!(
        r#"name: "{safe_name}"
deltas_dir: deltas
ledger_table: schemaflow_ledger

database:
  type: duckdb
  path: app.duckdb
"#
    );

    let path = root.join(CONFIG_FILE_NAME);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
