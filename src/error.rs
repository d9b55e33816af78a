//! Error types for forgepy
//!
//! All modules use `ForgepyResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for forgepy operations
pub type ForgepyResult<T> = Result<T, ForgepyError>;

/// All errors that can occur in forgepy
#[derive(Error, Debug)]
pub enum ForgepyError {
    // Platform / version errors
    #[error("Unsupported platform: {system} {machine}")]
    UnsupportedPlatform { system: String, machine: String },

    #[error("Unsupported Python version: {0}")]
    UnsupportedVersion(String),

    #[error("Host Python must be major version 3 to satisfy a '3.x' request, found {found}")]
    NativeMajorMismatch { found: String },

    #[error("No usable Python interpreter found on PATH (tried python3, python)")]
    InterpreterNotFound,

    // Installation errors
    #[error("Failed to setup miniforge at {}", .prefix.display())]
    MiniforgeSetup { prefix: PathBuf },

    #[error("Download failed: {url}: {reason}")]
    Download { url: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with {}: {command}", exit_label(.code))]
    CommandExit { command: String, code: Option<i32> },

    /// A passthrough child exited non-zero; its own output already explains why
    #[error("Process exited with code {0}")]
    ChildExit(i32),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {}", c),
        None => "signal".to_string(),
    }
}

impl ForgepyError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedVersion(_) => {
                Some("Use 3, 3.x, 3.<minor> or native (via --python, python.version or $PY)")
            }
            Self::InterpreterNotFound => Some("Install Python 3 or request an explicit 3.<minor>"),
            Self::MiniforgeSetup { .. } => Some("Run: forgepy clean, then retry"),
            Self::Download { .. } => Some("Check network access or miniforge.base_url"),
            _ => None,
        }
    }
}
