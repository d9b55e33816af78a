//! Host Python interpreter discovery

use crate::error::{ForgepyError, ForgepyResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Names tried, in order, when looking for the host interpreter
const CANDIDATES: [&str; 2] = ["python3", "python"];

/// Prints executable, major and minor on separate lines
const PROBE: &str =
    "import sys; print(sys.executable); print(sys.version_info[0]); print(sys.version_info[1])";

/// The Python interpreter already available on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInterpreter {
    pub executable: PathBuf,
    pub major: u32,
    pub minor: u32,
}

impl HostInterpreter {
    pub fn new(executable: impl Into<PathBuf>, major: u32, minor: u32) -> Self {
        Self {
            executable: executable.into(),
            major,
            minor,
        }
    }

    /// Find the first working interpreter on PATH
    pub async fn discover() -> ForgepyResult<Self> {
        for candidate in CANDIDATES {
            let output = Command::new(candidate)
                .args(["-c", PROBE])
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::null())
                .output()
                .await;

            match output {
                Ok(out) if out.status.success() => {
                    let stdout = String::from_utf8_lossy(&out.stdout);
                    if let Some(host) = parse_probe(&stdout) {
                        debug!(
                            "Host interpreter {} ({})",
                            host.executable.display(),
                            host.version()
                        );
                        return Ok(host);
                    }
                    debug!("Unexpected probe output from {}: {:?}", candidate, stdout);
                }
                Ok(_) => debug!("{} exited with failure", candidate),
                Err(e) => debug!("{} not runnable: {}", candidate, e),
            }
        }

        Err(ForgepyError::InterpreterNotFound)
    }

    /// "<major>.<minor>"
    pub fn version(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

/// Parse the three-line probe output
fn parse_probe(stdout: &str) -> Option<HostInterpreter> {
    let mut lines = stdout.lines().map(str::trim);
    let executable = lines.next().filter(|l| !l.is_empty())?;
    let major = lines.next()?.parse().ok()?;
    let minor = lines.next()?.parse().ok()?;
    Some(HostInterpreter::new(executable, major, minor))
}
