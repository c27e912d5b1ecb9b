//! Down command implementation

use anyhow::Result;
use sf_core::Direction;

use crate::cli::{GlobalArgs, RunArgs};
use crate::commands::common::RunSession;

/// Execute the down command
///
/// With no selection flags only the last applied delta is rolled back.
pub(crate) async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let selection = args.selection().resolve(Direction::Down)?;
    let session = RunSession::open(args, global)?;
    let result = session.executor.down(&selection).await;
    session.finish(result, global)
}
