//! Setup command - provision Python and report the handles

use super::shared::provision;
use crate::cli::args::SetupArgs;
use crate::config::Config;
use crate::env::EnvChange;
use crate::error::{ForgepyError, ForgepyResult};
use crate::python::PythonHandles;
use crate::ui::{self, UiContext};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Machine-readable setup result
#[derive(Debug, Serialize)]
struct SetupReport<'a> {
    version: &'a str,
    python: String,
    pip: String,
    env_dir: Option<&'a Path>,
    env: &'a [EnvChange],
}

impl<'a> SetupReport<'a> {
    fn new(handles: &'a PythonHandles) -> Self {
        Self {
            version: &handles.version,
            python: handles.python.to_string(),
            pip: handles.pip.to_string(),
            env_dir: handles.env_dir.as_deref(),
            env: &handles.env_changes,
        }
    }
}

/// Execute the setup command
pub async fn execute(args: SetupArgs, config: &Config) -> ForgepyResult<()> {
    let ctx = UiContext::detect().with_quiet(args.json || args.export);
    let handles = provision(&args.version, config, &ctx).await?;

    if args.github_env {
        write_github_env(&handles.env_changes)?;
        ui::step_ok(&ctx, "Exported environment to GitHub Actions");
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&SetupReport::new(&handles))?
        );
    } else if args.export {
        for line in export_lines(&handles.env_changes) {
            println!("{}", line);
        }
    } else {
        ui::key_value(&ctx, "python", &handles.python.to_string());
        ui::key_value(&ctx, "pip", &handles.pip.to_string());
        if let Some(ref dir) = handles.env_dir {
            ui::key_value(&ctx, "environment", &dir.display().to_string());
        }
        ui::outro_success(&ctx, &format!("Python {} ready", handles.version));
    }

    Ok(())
}

/// Single-quote a value for POSIX shells
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render changes as `export` statements
fn export_lines(changes: &[EnvChange]) -> Vec<String> {
    let sep = if cfg!(windows) { ";" } else { ":" };
    changes
        .iter()
        .map(|change| match change {
            EnvChange::Set { var, value } => format!("export {}={}", var, shell_quote(value)),
            EnvChange::Prepend { var, paths } => {
                let joined = paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(sep);
                format!("export {}={}\"{}${}\"", var, shell_quote(&joined), sep, var)
            }
        })
        .collect()
}

/// Lines for `$GITHUB_ENV` and `$GITHUB_PATH`.
///
/// The runner prepends each `$GITHUB_PATH` line in turn, so entries are
/// written lowest priority first.
fn github_lines(changes: &[EnvChange]) -> (Vec<String>, Vec<String>) {
    let mut env_lines = Vec::new();
    let mut path_lines = Vec::new();

    for change in changes {
        match change {
            EnvChange::Set { var, value } => env_lines.push(format!("{}={}", var, value)),
            EnvChange::Prepend { var, paths } if var == "PATH" => {
                path_lines.extend(paths.iter().rev().map(|p| p.display().to_string()));
            }
            EnvChange::Prepend { var, paths } => {
                // Only PATH has a dedicated file; other lists are written whole
                let value = std::env::var(var).unwrap_or_else(|_| {
                    paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(if cfg!(windows) { ";" } else { ":" })
                });
                env_lines.push(format!("{}={}", var, value));
            }
        }
    }

    (env_lines, path_lines)
}

fn write_github_env(changes: &[EnvChange]) -> ForgepyResult<()> {
    let env_file = github_file("GITHUB_ENV")?;
    let path_file = github_file("GITHUB_PATH")?;
    let (env_lines, path_lines) = github_lines(changes);

    append_lines(&env_file, &env_lines)?;
    append_lines(&path_file, &path_lines)?;
    info!(
        "Wrote {} variables and {} PATH entries for GitHub Actions",
        env_lines.len(),
        path_lines.len()
    );
    Ok(())
}

fn github_file(var: &str) -> ForgepyResult<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            ForgepyError::User(format!(
                "${} is not set; --github-env only works inside GitHub Actions",
                var
            ))
        })
}

fn append_lines(path: &Path, lines: &[String]) -> ForgepyResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ForgepyError::io(format!("opening {}", path.display()), e))?;

    for line in lines {
        writeln!(file, "{}", line)
            .map_err(|e| ForgepyError::io(format!("writing {}", path.display()), e))?;
    }
    Ok(())
}
