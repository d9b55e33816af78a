//! Resolve command - print the Python version a setup would provision

use super::shared::resolve_version;
use crate::cli::args::VersionArgs;
use crate::config::Config;
use crate::error::ForgepyResult;

/// Execute the resolve command
pub async fn execute(args: VersionArgs, config: &Config) -> ForgepyResult<()> {
    let (version, _host) = resolve_version(&args, config).await?;
    println!("{}", version);
    Ok(())
}
