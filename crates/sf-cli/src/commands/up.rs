//! Up command implementation

use anyhow::Result;
use sf_core::Direction;

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::RunSession;

/// Execute the up command
pub(crate) async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let selection = args.selection().resolve(Direction::Up)?;
    let session = RunSession::open(args, global)?;
    let result = session.executor.up(&selection).await;
    session.finish(result, global)
}
