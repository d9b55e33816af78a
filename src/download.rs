//! Dependency download and installer execution
//!
//! Installers are fetched once into `<cache_home>/deps` and reused across
//! runs. An install is skipped entirely when its output directory already
//! has content, so callers that need a clean install remove it first.

use crate::error::{ForgepyError, ForgepyResult};
use crate::shell::{Command, CommandRunner};
use crate::ui::{DownloadProgress, UiContext};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Downloads an installer and runs it into a destination prefix
#[async_trait]
pub trait DepInstaller: Send + Sync {
    /// Fetch `url` and run it with `args`, installing into `outdir`
    async fn download_dep(&self, url: &str, outdir: &Path, args: &[String]) -> ForgepyResult<()>;
}

/// How a cached installer file is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallerKind {
    /// POSIX shell installer, run through `bash`
    Shell,
    /// Native executable installer
    Executable,
}

impl InstallerKind {
    /// Classify an installer by its file name
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".sh") {
            Some(Self::Shell)
        } else if name.ends_with(".exe") {
            Some(Self::Executable)
        } else {
            None
        }
    }

    /// Build the command that runs `installer` with `args`
    pub fn command(&self, installer: &Path, args: &[String]) -> Command {
        match self {
            Self::Shell => Command::new("bash").bake([installer]).bake(args),
            Self::Executable => Command::new(installer).bake(args),
        }
    }
}

/// Installer backed by HTTP downloads and real subprocesses
pub struct HttpInstaller {
    deps_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
    ctx: UiContext,
}

impl HttpInstaller {
    pub fn new(deps_dir: PathBuf, runner: Arc<dyn CommandRunner>, ctx: UiContext) -> Self {
        Self {
            deps_dir,
            runner,
            ctx,
        }
    }

    /// Ensure `url` is present in the deps cache and return its local path
    async fn fetch_cached(&self, url: &str) -> ForgepyResult<PathBuf> {
        let local = self.deps_dir.join(cache_file_name(url));
        if local.exists() {
            debug!("Using cached download {}", local.display());
            return Ok(local);
        }

        tokio::fs::create_dir_all(&self.deps_dir)
            .await
            .map_err(|e| ForgepyError::io(format!("creating {}", self.deps_dir.display()), e))?;

        info!("Downloading {}", url);
        let progress = DownloadProgress::new(&self.ctx, file_name(url));
        let url_owned = url.to_string();
        let dest = local.clone();

        tokio::task::spawn_blocking(move || {
            let result = fetch_to(&url_owned, &dest, &progress);
            progress.finish();
            result
        })
        .await
        .map_err(|e| ForgepyError::download(url, format!("download task failed: {}", e)))??;

        Ok(local)
    }
}

#[async_trait]
impl DepInstaller for HttpInstaller {
    async fn download_dep(&self, url: &str, outdir: &Path, args: &[String]) -> ForgepyResult<()> {
        if dir_has_entries(outdir) {
            debug!("{} already populated, skipping install", outdir.display());
            return Ok(());
        }

        let kind = InstallerKind::from_file_name(file_name(url))
            .ok_or_else(|| ForgepyError::download(url, "unsupported installer type"))?;

        let installer = self.fetch_cached(url).await?;
        let command = kind.command(&installer, args);
        info!("Running installer {}", installer.display());
        self.runner.run(&command, &[] as &[OsString]).await
    }
}

/// Whether `dir` exists and contains at least one entry
fn dir_has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Last path segment of a URL
fn file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Content-addressed cache name: short URL hash plus the original file name
fn cache_file_name(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}-{}", &digest[..12], file_name(url))
}

/// Blocking download of `url` to `dest` via a `.part` file
fn fetch_to(url: &str, dest: &Path, progress: &DownloadProgress) -> ForgepyResult<()> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| ForgepyError::download(url, e.to_string()))?;

    let total = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    progress.set_length(total);

    let mut part = dest.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    let mut file = fs::File::create(&part)
        .map_err(|e| ForgepyError::io(format!("creating {}", part.display()), e))?;
    let mut reader = response.into_body().into_reader();
    let mut buf = vec![0u8; 64 * 1024];

    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| ForgepyError::download(url, e.to_string()))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .map_err(|e| ForgepyError::io(format!("writing {}", part.display()), e))?;
        progress.inc(n as u64);
    }

    file.flush()
        .map_err(|e| ForgepyError::io(format!("writing {}", part.display()), e))?;
    drop(file);

    fs::rename(&part, dest)
        .map_err(|e| ForgepyError::io(format!("moving download to {}", dest.display()), e))?;

    Ok(())
}
