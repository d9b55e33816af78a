//! Python version request resolution

use super::interpreter::HostInterpreter;
use crate::error::{ForgepyError, ForgepyResult};

/// Environment variable consulted when no version is configured
pub const VERSION_ENV: &str = "PY";

/// Resolved value meaning "use the host interpreter as-is"
pub const NATIVE: &str = "(Native)";

/// A classified version request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// Unset, "3" or "3.x": whatever 3.<minor> the host runs
    AnyPython3,
    /// "3.<minor>"
    Exact(String),
    /// "native" / "Native"
    Native,
}

impl VersionSpec {
    /// Classify a raw request. An empty string is not a valid request.
    pub fn parse(raw: Option<&str>) -> ForgepyResult<Self> {
        match raw {
            None | Some("3") | Some("3.x") => Ok(Self::AnyPython3),
            Some("native") | Some("Native") => Ok(Self::Native),
            Some(v) if is_exact_python3(v) => Ok(Self::Exact(v.to_string())),
            Some(v) => Err(ForgepyError::UnsupportedVersion(v.to_string())),
        }
    }

    /// Resolve to "<major>.<minor>" or [`NATIVE`].
    ///
    /// `host` is only consulted for [`VersionSpec::AnyPython3`].
    pub fn resolve(&self, host: Option<&HostInterpreter>) -> ForgepyResult<String> {
        match self {
            Self::AnyPython3 => {
                let host = host.ok_or(ForgepyError::InterpreterNotFound)?;
                if host.major != 3 {
                    return Err(ForgepyError::NativeMajorMismatch {
                        found: host.version(),
                    });
                }
                Ok(host.version())
            }
            Self::Exact(v) => Ok(v.clone()),
            Self::Native => Ok(NATIVE.to_string()),
        }
    }

    /// Whether resolving needs the host interpreter's version
    pub fn needs_host(&self) -> bool {
        matches!(self, Self::AnyPython3)
    }
}

/// `^3\.\d+$`
fn is_exact_python3(v: &str) -> bool {
    v.strip_prefix("3.")
        .is_some_and(|minor| !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()))
}

/// Pick the requested version: configured value first, then `$PY`.
///
/// An empty configured value falls through; an empty `$PY` is kept and
/// rejected later.
pub fn requested_version(configured: Option<&str>, env_value: Option<&str>) -> Option<String> {
    configured
        .filter(|v| !v.is_empty())
        .or(env_value)
        .map(str::to_string)
}

/// Resolve the desired Python version.
///
/// `configured` comes from CLI/config, `env_value` from `$PY`.
pub fn desired_python_version(
    configured: Option<&str>,
    env_value: Option<&str>,
    host: &HostInterpreter,
) -> ForgepyResult<String> {
    let requested = requested_version(configured, env_value);
    VersionSpec::parse(requested.as_deref())?.resolve(Some(host))
}
