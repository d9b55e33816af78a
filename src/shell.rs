//! Command handles with pre-bound arguments
//!
//! A [`Command`] is an executable plus leading arguments. [`Command::bake`]
//! returns a new handle with more arguments appended, so `pip` can be derived
//! from `python` as `python -m pip`.

use crate::error::{ForgepyError, ForgepyResult};
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

/// Max number of output lines logged when a command fails.
const ERROR_TAIL_LINES: usize = 50;

/// An executable with pre-bound leading arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Command {
    /// Create a handle for `program` with no bound arguments
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Return a new handle with `args` appended to the bound arguments
    pub fn bake<I, S>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut baked = self.clone();
        baked
            .args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        baked
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Build a tokio command with the bound arguments followed by `extra`
    pub fn to_tokio<I, S>(&self, extra: I) -> tokio::process::Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args).args(extra);
        cmd
    }

    /// Render the full invocation including `extra`, for messages
    pub fn display_with<S: AsRef<OsStr>>(&self, extra: &[S]) -> String {
        let mut rendered = self.to_string();
        for arg in extra {
            rendered.push(' ');
            rendered.push_str(&arg.as_ref().to_string_lossy());
        }
        rendered
    }

    /// Run with inherited stdio and return the exit code.
    ///
    /// Used for passthrough invocations where the caller owns the output.
    pub async fn status<S: AsRef<OsStr>>(&self, extra: &[S]) -> ForgepyResult<i32> {
        let rendered = self.display_with(extra);
        debug!("Running {}", rendered);

        let status = self
            .to_tokio(extra)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ForgepyError::command_failed(&rendered, e))?;

        Ok(status.code().unwrap_or(1))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Executes command handles
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` with `extra` arguments appended; non-zero exit is an error
    async fn run(&self, command: &Command, extra: &[OsString]) -> ForgepyResult<()>;
}

/// Runs commands as real subprocesses, streaming their output to a callback
pub struct SystemRunner {
    on_output: Box<dyn Fn(String) + Send + Sync>,
}

impl SystemRunner {
    pub fn new(on_output: impl Fn(String) + Send + Sync + 'static) -> Self {
        Self {
            on_output: Box::new(on_output),
        }
    }

    /// A runner that forwards every output line to `debug!`
    pub fn quiet() -> Self {
        Self::new(|line| debug!("{}", line))
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &Command, extra: &[OsString]) -> ForgepyResult<()> {
        let rendered = command.display_with(extra);
        debug!("Running {}", rendered);

        let mut child = command
            .to_tokio(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ForgepyError::command_failed(&rendered, e))?;

        let output = stream_child_output(&mut child, self.on_output.as_ref()).await;

        let status = child
            .wait()
            .await
            .map_err(|e| ForgepyError::command_failed(&rendered, e))?;

        if !status.success() {
            warn!("{} failed:\n{}", rendered, error_tail(&output));
            return Err(ForgepyError::CommandExit {
                command: rendered,
                code: status.code(),
            });
        }

        Ok(())
    }
}

/// Last `ERROR_TAIL_LINES` lines of output, joined.
fn error_tail(lines: &[String]) -> String {
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Stream stdout+stderr from a child process, calling `on_output` for each line.
///
/// Returns all collected output lines for error reporting.
async fn stream_child_output(
    child: &mut tokio::process::Child,
    on_output: &(dyn Fn(String) + Send + Sync),
) -> Vec<String> {
    let mut all_output = Vec::new();
    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return all_output;
    };

    let mut stderr_reader = BufReader::new(stderr).lines();
    let mut stdout_reader = BufReader::new(stdout).lines();

    let mut stderr_done = false;
    let mut stdout_done = false;

    while !stderr_done || !stdout_done {
        tokio::select! {
            line = stderr_reader.next_line(), if !stderr_done => {
                match line {
                    Ok(Some(line)) => {
                        on_output(line.clone());
                        all_output.push(line);
                    }
                    _ => stderr_done = true,
                }
            }
            line = stdout_reader.next_line(), if !stdout_done => {
                match line {
                    Ok(Some(line)) => {
                        on_output(line.clone());
                        all_output.push(line);
                    }
                    _ => stdout_done = true,
                }
            }
        }
    }

    all_output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn bake_appends_without_mutating_original() {
        let python = Command::new("/opt/env/bin/python");
        let pip = python.bake(["-m", "pip"]);

        assert!(python.args().is_empty());
        assert_eq!(pip.program(), Path::new("/opt/env/bin/python"));
        assert_eq!(pip.args(), &[OsString::from("-m"), OsString::from("pip")]);
    }

    #[test]
    fn bake_chains() {
        let conda = Command::new("conda");
        let create = conda.bake(["create"]).bake(["-y"]);
        assert_eq!(create.to_string(), "conda create -y");
    }

    #[test]
    fn display_with_extra() {
        let pip = Command::new("python").bake(["-m", "pip"]);
        assert_eq!(
            pip.display_with(&["install", "wheel"]),
            "python -m pip install wheel"
        );
    }

    #[test]
    fn error_tail_keeps_last_lines() {
        let lines: Vec<String> = (0..120).map(|i| i.to_string()).collect();
        let tail = error_tail(&lines);
        assert!(tail.starts_with("70\n"));
        assert!(tail.ends_with("119"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_streams_output() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let runner = SystemRunner::new(move |line| sink.lock().unwrap().push(line));

        let echo = Command::new("sh").bake(["-c"]);
        runner
            .run(&echo, &[OsString::from("echo hello; echo oops >&2")])
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert!(seen.contains(&"hello".to_string()));
        assert!(seen.contains(&"oops".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_reports_exit_code() {
        let runner = SystemRunner::quiet();
        let err = runner
            .run(&Command::new("sh").bake(["-c", "exit 3"]), &[])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ForgepyError::CommandExit { code: Some(3), .. }
        ));
    }

    #[tokio::test]
    async fn missing_program_is_spawn_failure() {
        let runner = SystemRunner::quiet();
        let err = runner
            .run(&Command::new("/nonexistent/forgepy-test-binary"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ForgepyError::CommandFailed { .. }));
    }
}
