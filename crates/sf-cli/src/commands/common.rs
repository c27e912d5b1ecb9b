//! Shared utilities for CLI commands

use anyhow::{bail, Context, Result};
use serde::Serialize;
use sf_core::{Config, DbType, DeltaCatalog};
use sf_db::{Database, DuckDbBackend, Ledger};
use sf_engine::{CancelFlag, EngineError, EngineResult, Executor, RunOptions, RunReport};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::cli::{GlobalArgs, OutputFormat, RunArgs};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the failure has already been reported.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: its root directory and parsed config
#[derive(Debug)]
pub(crate) struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    pub(crate) fn deltas_dir(&self) -> PathBuf {
        self.config.deltas_dir_absolute(&self.root)
    }

    pub(crate) fn catalog(&self) -> DeltaCatalog {
        DeltaCatalog::new(self.deltas_dir())
    }

    pub(crate) fn ledger(&self, db: Arc<dyn Database>) -> Ledger {
        Ledger::new(db, self.config.ledger_table.clone())
    }
}

/// Load the project config from `--project-dir`.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = global.project_dir.clone();
    let config = Config::load_from_dir(&root)
        .with_context(|| format!("Failed to load project at {}", root.display()))?;
    Ok(Project { root, config })
}

/// Pick the connection string: `--conn-string`, then the environment
/// variable named by `--conn-key`, then the database path from the config.
pub(crate) fn resolve_connection(global: &GlobalArgs, project: &Project) -> Result<String> {
    if let Some(conn) = &global.conn_string {
        if conn.trim().is_empty() {
            bail!("--conn-string must not be empty");
        }
        return Ok(conn.clone());
    }

    if let Some(key) = &global.conn_key {
        let value = std::env::var(key).with_context(|| {
            format!("Environment variable '{}' (from --conn-key) is not set", key)
        })?;
        if value.trim().is_empty() {
            bail!("Environment variable '{}' (from --conn-key) is empty", key);
        }
        return Ok(value);
    }

    Ok(project.config.database_path_absolute(&project.root))
}

/// Open the project database.
pub(crate) fn open_database(global: &GlobalArgs, project: &Project) -> Result<Arc<dyn Database>> {
    let conn = resolve_connection(global, project)?;
    match project.config.database.db_type {
        DbType::DuckDb => {
            let db = DuckDbBackend::new(&conn)
                .with_context(|| format!("Failed to open DuckDB database: {}", conn))?;
            log::debug!("Connected to {} database {}", db.db_type(), conn);
            Ok(Arc::new(db))
        }
    }
}

/// Everything an up, down or post run needs
pub(crate) struct RunSession {
    pub executor: Executor,
    ctrl_c: JoinHandle<()>,
}

impl RunSession {
    /// Load the project, connect, and arm Ctrl-C to cancel the run.
    pub(crate) fn open(args: &RunArgs, global: &GlobalArgs) -> Result<Self> {
        let project = load_project(global)?;
        let db = open_database(global, &project)?;
        let cancel = CancelFlag::new();
        let options = RunOptions {
            dry_run: args.dry_run,
            prune_no_ops: args.prune,
            cancel: cancel.clone(),
        };
        let executor = Executor::new(db.clone(), project.ledger(db), project.catalog(), options);
        Ok(Self {
            executor,
            ctrl_c: watch_ctrl_c(cancel),
        })
    }

    /// Print the outcome and turn a failed run into a non-zero exit.
    pub(crate) fn finish(self, result: EngineResult<RunReport>, global: &GlobalArgs) -> Result<()> {
        self.ctrl_c.abort();
        let report = result?;

        match global.output {
            OutputFormat::Text => {
                print!("{}", render_text(&report));
                if let Some(failure) = &report.failure {
                    eprintln!("Error: {}", failure);
                }
            }
            OutputFormat::Json => println!("{}", render_json(&report)?),
        }

        match &report.failure {
            Some(failure) => Err(ExitCode(exit_code_for(failure)).into()),
            None => Ok(()),
        }
    }
}

fn watch_ctrl_c(cancel: CancelFlag) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, stopping after the current delta");
            cancel.cancel();
        }
    })
}

/// Process exit code for a run that executed but did not finish cleanly.
pub(crate) fn exit_code_for(failure: &EngineError) -> i32 {
    match failure {
        EngineError::LedgerDivergence { .. } => 2,
        EngineError::Cancelled { .. } => 130,
        _ => 1,
    }
}

fn tag_list(tags: &[sf_core::Tag]) -> String {
    tags.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Human-readable summary of a run.
pub(crate) fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    let direction = report.direction;

    if report.dry_run {
        if report.planned.is_empty() {
            out.push_str(&format!("Dry run: no {} deltas would run\n", direction));
        } else {
            out.push_str(&format!(
                "Dry run: would run {} {} delta(s) in order: {}\n",
                report.planned.len(),
                direction,
                tag_list(&report.planned)
            ));
        }
    } else if report.applied.is_empty() {
        out.push_str(&format!("No {} deltas ran\n", direction));
    } else {
        out.push_str(&format!(
            "Ran {} of {} {} delta(s): {}\n",
            report.applied.len(),
            report.planned.len(),
            direction,
            tag_list(&report.applied)
        ));
    }

    for skipped in &report.skipped {
        out.push_str(&format!("  skipped {} ({})\n", skipped.tag, skipped.reason));
    }
    out
}

#[derive(Serialize)]
struct ReportJson<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    error: Option<String>,
}

/// JSON form of a run report, with the failure rendered as a string.
pub(crate) fn render_json(report: &RunReport) -> Result<String> {
    let json = ReportJson {
        report,
        error: report.failure.as_ref().map(|e| e.to_string()),
    };
    serde_json::to_string_pretty(&json).context("Failed to serialize run report")
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
