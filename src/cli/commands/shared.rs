//! Version resolution and provisioner wiring shared by commands

use crate::cli::args::VersionArgs;
use crate::config::Config;
use crate::download::HttpInstaller;
use crate::error::ForgepyResult;
use crate::paths;
use crate::platform::PlatformIdentity;
use crate::python::version::requested_version;
use crate::python::{HostInterpreter, Provisioner, PythonHandles, VersionSpec, VERSION_ENV};
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UiContext;
use std::sync::Arc;
use tracing::debug;

/// Resolve the requested version, discovering the host interpreter only
/// when the request depends on it.
pub(super) async fn resolve_version(
    args: &VersionArgs,
    config: &Config,
) -> ForgepyResult<(String, Option<HostInterpreter>)> {
    let env_value = std::env::var(VERSION_ENV).ok();
    let configured = args.python.as_deref().or(config.python.version.as_deref());
    let requested = requested_version(configured, env_value.as_deref());
    debug!("Requested Python version: {:?}", requested);

    let spec = VersionSpec::parse(requested.as_deref())?;
    let host = if spec.needs_host() || spec == VersionSpec::Native {
        Some(HostInterpreter::discover().await?)
    } else {
        None
    };

    let version = spec.resolve(host.as_ref())?;
    Ok((version, host))
}

/// Build a provisioner backed by real downloads and subprocesses
pub(super) fn provisioner(config: &Config, ctx: &UiContext) -> Provisioner {
    let cache_home = paths::cache_home(config.cache.home.as_deref());
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner::quiet());
    let installer = Arc::new(HttpInstaller::new(
        paths::deps_dir(&cache_home),
        Arc::clone(&runner),
        ctx.clone(),
    ));

    Provisioner::new(
        PlatformIdentity::detect(),
        cache_home,
        config.miniforge.clone(),
        installer,
        runner,
        ctx.clone(),
    )
}

/// Resolve and provision in one step
pub(super) async fn provision(
    args: &VersionArgs,
    config: &Config,
    ctx: &UiContext,
) -> ForgepyResult<PythonHandles> {
    let (version, host) = resolve_version(args, config).await?;
    provisioner(config, ctx)
        .setup_python(&version, host.as_ref())
        .await
}
