//! Python and pip passthrough commands
//!
//! Provision quietly, then run the handle with inherited stdio. A non-zero
//! exit is reported as `ChildExit` so `main` can mirror the code.

use super::shared::provision;
use crate::cli::args::ExecArgs;
use crate::config::Config;
use crate::error::{ForgepyError, ForgepyResult};
use crate::shell::Command;
use crate::ui::UiContext;

/// Run the provisioned `python`
pub async fn python(args: ExecArgs, config: &Config) -> ForgepyResult<()> {
    let ctx = UiContext::detect().with_quiet(true);
    let handles = provision(&args.version, config, &ctx).await?;
    passthrough(&handles.python, &args).await
}

/// Run the provisioned `pip`
pub async fn pip(args: ExecArgs, config: &Config) -> ForgepyResult<()> {
    let ctx = UiContext::detect().with_quiet(true);
    let handles = provision(&args.version, config, &ctx).await?;
    passthrough(&handles.pip, &args).await
}

async fn passthrough(command: &Command, args: &ExecArgs) -> ForgepyResult<()> {
    let code = command.status(args.args.as_slice()).await?;
    if code != 0 {
        return Err(ForgepyError::ChildExit(code));
    }
    Ok(())
}
