//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use sf_core::RawSelection;
use std::path::PathBuf;

/// Schemaflow - numbered SQL schema deltas with up, down and post phases
#[derive(Parser, Debug)]
#[command(name = "sf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Database to connect to, overriding the config (DuckDB file path or ":memory:")
    #[arg(long, global = true)]
    pub conn_string: Option<String>,

    /// Name of an environment variable holding the connection string
    #[arg(long, global = true)]
    pub conn_key: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output formats for command results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the deltas directory and the ledger table
    Init(InitArgs),

    /// Create empty delta files at the next free tag
    Create(CreateArgs),

    /// Apply up deltas that are not yet in the ledger, oldest first
    Up(RunArgs),

    /// Roll back applied deltas, newest first
    ///
    /// Without selection flags only the last applied delta is rolled back.
    /// For rollback `--from` is the newest tag to start from and `--to` the
    /// oldest tag to stop at: `sf down --from 5 --to 3` rolls back 5, 4, 3.
    Down(RunArgs),

    /// Run post deltas whose up delta is applied and still pending cleanup
    Post(PostArgs),
}

/// Arguments for the init command
#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Project name written to a new schemaflow.yml (default: directory name)
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Delta name, used in the file names after the tag
    pub name: String,

    /// Also create a post delta
    #[arg(long)]
    pub post: bool,
}

/// Selection and run flags shared by up, down and post
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Range bound: oldest tag for up/post, newest tag for down
    #[arg(short, long)]
    pub from: Option<String>,

    /// Range bound: newest tag for up/post, oldest tag for down
    #[arg(short, long)]
    pub to: Option<String>,

    /// Run only these tags (repeatable, comma-separated)
    #[arg(short = 'c', long = "cherry-pick", value_delimiter = ',')]
    pub cherry_pick: Vec<String>,

    /// Skip deltas that contain only comments and whitespace
    #[arg(long)]
    pub prune: bool,

    /// Show what would run without executing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn selection(&self) -> RawSelection {
        RawSelection {
            from: self.from.clone(),
            to: self.to.clone(),
            cherry_pick: self.cherry_pick.clone(),
        }
    }
}

/// Arguments for the post command
#[derive(Args, Debug, Clone, Default)]
pub struct PostArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Also run post deltas that have no pending ledger entry
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
