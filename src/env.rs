//! Process environment mutation
//!
//! Changes made here last for the lifetime of the process and are never
//! restored. Every change is also returned as an [`EnvChange`] so the CLI
//! can replay it into the parent shell or CI runner.

use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Variables CMake's FindPython modules consult to locate an installation.
pub const ROOT_DIR_VARS: [&str; 3] = ["Python_ROOT_DIR", "Python2_ROOT_DIR", "Python3_ROOT_DIR"];

/// A single environment mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvChange {
    /// Entries prepended to a path-list variable, in order
    Prepend { var: String, paths: Vec<PathBuf> },
    /// Variable overwritten with a value
    Set { var: String, value: String },
}

/// Prepend `paths` to the path-list variable `var`.
///
/// New entries keep their given order; existing entries that duplicate one
/// of them are dropped so repeated calls do not grow the variable.
pub fn path_prepend(var: &str, paths: &[PathBuf]) -> EnvChange {
    let current = std::env::var_os(var).unwrap_or_default();
    let value = prepended_value(&current, paths);
    debug!("Prepending {} entries to {}", paths.len(), var);
    std::env::set_var(var, value);

    EnvChange::Prepend {
        var: var.to_string(),
        paths: paths.to_vec(),
    }
}

/// Compute the new value of a path-list variable.
///
/// Entries that contain the list separator can't be represented and are
/// skipped.
fn prepended_value(current: &OsString, paths: &[PathBuf]) -> OsString {
    let mut entries: Vec<PathBuf> = Vec::new();
    let candidates = paths.iter().cloned().chain(std::env::split_paths(current));
    for entry in candidates {
        if entry.as_os_str().is_empty() || entries.contains(&entry) {
            continue;
        }
        if std::env::join_paths([&entry]).is_err() {
            warn!("Skipping path entry containing a separator: {}", entry.display());
            continue;
        }
        entries.push(entry);
    }

    std::env::join_paths(&entries).unwrap_or_else(|_| current.clone())
}

/// Set a variable and record the change
pub fn set_var(var: &str, value: &str) -> EnvChange {
    debug!("Setting {}={}", var, value);
    std::env::set_var(var, value);
    EnvChange::Set {
        var: var.to_string(),
        value: value.to_string(),
    }
}

/// Point all three CMake Python root variables at `dir`
pub fn set_root_dirs(dir: &Path) -> Vec<EnvChange> {
    let value = dir.display().to_string();
    ROOT_DIR_VARS
        .iter()
        .map(|var| set_var(var, &value))
        .collect()
}
