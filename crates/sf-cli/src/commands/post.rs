//! Post command implementation

use anyhow::Result;
use sf_core::Direction;

use crate::cli::{GlobalArgs, PostArgs};
use crate::commands::common::RunSession;

/// Execute the post command
pub(crate) async fn execute(args: &PostArgs, global: &GlobalArgs) -> Result<()> {
    let selection = args.run.selection().resolve(Direction::Post)?;
    let session = RunSession::open(&args.run, global)?;
    let result = session.executor.post(&selection, args.force).await;
    session.finish(result, global)
}
