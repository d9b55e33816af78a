//! Python environment provisioning
//!
//! Turns a resolved version string into `python`/`pip` command handles,
//! installing the shared Miniforge distribution and a per-version conda
//! environment under the cache home when needed.

use super::interpreter::HostInterpreter;
use super::miniforge::{conda_path, setup_miniforge};
use super::version::NATIVE;
use crate::config::schema::MiniforgeConfig;
use crate::download::DepInstaller;
use crate::env::{self, EnvChange};
use crate::error::{ForgepyError, ForgepyResult};
use crate::paths;
use crate::platform::PlatformIdentity;
use crate::shell::{Command, CommandRunner};
use crate::ui::{self, TaskSpinner, UiContext};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Ready-to-use interpreter handles
#[derive(Debug, Clone)]
pub struct PythonHandles {
    /// Resolved version, or `(Native)`
    pub version: String,
    pub python: Command,
    /// `python -m pip`
    pub pip: Command,
    /// Conda environment directory; `None` for the host interpreter
    pub env_dir: Option<PathBuf>,
    /// Process environment changes made while provisioning
    pub env_changes: Vec<EnvChange>,
}

/// Paths inside one conda environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLayout {
    pub dir: PathBuf,
    pub exe: PathBuf,
    /// Entries to prepend to PATH, highest priority first
    pub path_entries: Vec<PathBuf>,
}

/// Compute the environment layout for `version` under `prefix`
pub fn env_layout(platform: &PlatformIdentity, prefix: &Path, version: &str) -> EnvLayout {
    let dir = prefix.join("envs").join(version);
    let condabin = prefix.join("condabin");

    if platform.is_windows() {
        EnvLayout {
            exe: dir.join("python.exe"),
            path_entries: vec![
                dir.clone(),
                dir.join("Library").join("mingw-w64").join("bin"),
                dir.join("Library").join("usr").join("bin"),
                dir.join("Library").join("bin"),
                dir.join("Scripts"),
                dir.join("bin"),
                condabin,
            ],
            dir,
        }
    } else {
        EnvLayout {
            exe: dir.join("bin").join("python"),
            path_entries: vec![dir.join("bin"), condabin],
            dir,
        }
    }
}

fn handles_for(executable: &Path) -> (Command, Command) {
    let python = Command::new(executable);
    let pip = python.bake(["-m", "pip"]);
    (python, pip)
}

/// Provisions Python environments under a cache home
pub struct Provisioner {
    platform: PlatformIdentity,
    cache_home: PathBuf,
    miniforge: MiniforgeConfig,
    installer: Arc<dyn DepInstaller>,
    runner: Arc<dyn CommandRunner>,
    ctx: UiContext,
}

impl Provisioner {
    pub fn new(
        platform: PlatformIdentity,
        cache_home: PathBuf,
        miniforge: MiniforgeConfig,
        installer: Arc<dyn DepInstaller>,
        runner: Arc<dyn CommandRunner>,
        ctx: UiContext,
    ) -> Self {
        Self {
            platform,
            cache_home,
            miniforge,
            installer,
            runner,
            ctx,
        }
    }

    pub fn prefix(&self) -> PathBuf {
        paths::miniforge_prefix(&self.cache_home)
    }

    /// Find or create the Python environment for `version` and return its
    /// `python` and `pip` handles.
    ///
    /// `version` is the output of version resolution. For `(Native)` the
    /// host interpreter is used as-is and `host` must be provided.
    pub async fn setup_python(
        &self,
        version: &str,
        host: Option<&HostInterpreter>,
    ) -> ForgepyResult<PythonHandles> {
        ui::intro(&self.ctx, &format!("Setup Python {}", version));

        if version == NATIVE {
            ui::step_info(&self.ctx, "Using your current Python interpreter as requested.");
            let host = host.ok_or(ForgepyError::InterpreterNotFound)?;
            let (python, pip) = handles_for(host.executable());
            return Ok(PythonHandles {
                version: version.to_string(),
                python,
                pip,
                env_dir: None,
                env_changes: Vec::new(),
            });
        }

        let prefix = self.prefix();
        let conda = self.ensure_miniforge(&prefix).await?;
        let layout = env_layout(&self.platform, &prefix, version);

        let mut env_changes = vec![env::path_prepend("PATH", &layout.path_entries)];

        if layout.exe.exists() {
            ui::step_ok_detail(
                &self.ctx,
                &format!("Environment {} present", version),
                &layout.dir.display().to_string(),
            );
        } else {
            self.create_env(&conda, version).await?;
        }

        // For CMake's FindPython
        env_changes.extend(env::set_root_dirs(&layout.dir));

        let (python, pip) = handles_for(&layout.exe);
        Ok(PythonHandles {
            version: version.to_string(),
            python,
            pip,
            env_dir: Some(layout.dir),
            env_changes,
        })
    }

    /// Install Miniforge, wiping and retrying once if `conda` is missing
    async fn ensure_miniforge(&self, prefix: &Path) -> ForgepyResult<Command> {
        self.install_miniforge(prefix).await?;

        let conda = conda_path(&self.platform, prefix);
        if !conda.exists() {
            warn!(
                "{} missing after install, reinstalling Miniforge",
                conda.display()
            );
            if let Err(e) = tokio::fs::remove_dir_all(prefix).await {
                warn!("Failed to remove {}: {}", prefix.display(), e);
            }

            self.install_miniforge(prefix).await?;
            if !conda.exists() {
                return Err(ForgepyError::MiniforgeSetup {
                    prefix: prefix.to_path_buf(),
                });
            }
        }

        ui::step_ok_detail(&self.ctx, "Miniforge ready", &prefix.display().to_string());
        Ok(Command::new(conda))
    }

    async fn install_miniforge(&self, prefix: &Path) -> ForgepyResult<()> {
        setup_miniforge(
            self.installer.as_ref(),
            &self.platform,
            prefix,
            &self.miniforge,
        )
        .await
    }

    async fn create_env(&self, conda: &Command, version: &str) -> ForgepyResult<()> {
        info!("Creating conda environment {}", version);
        let mut spinner = TaskSpinner::new(&self.ctx);
        spinner.start(&format!("Creating environment {}...", version));

        let extra: Vec<OsString> = ["-y", "-n", version]
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(OsString::from(format!("python={}", version))))
            .collect();

        match self.runner.run(&conda.bake(["create"]), &extra).await {
            Ok(()) => {
                spinner.stop(&format!("Environment {} created", version));
                Ok(())
            }
            Err(e) => {
                spinner.stop_error(&format!("Failed to create environment {}", version));
                Err(e)
            }
        }
    }
}
