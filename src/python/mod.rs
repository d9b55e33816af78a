//! Python provisioning
//!
//! - `version`: classify the requested version (`3`, `3.x`, `3.<minor>`, `native`)
//! - `miniforge`: pick and run the Miniforge installer for the host
//! - `provision`: create the per-version conda environment and hand back
//!   `python`/`pip` handles

mod interpreter;
pub mod miniforge;
mod provision;
pub mod version;

pub use interpreter::HostInterpreter;
pub use miniforge::{installer_for, setup_miniforge, InstallerPlan};
pub use provision::{env_layout, EnvLayout, Provisioner, PythonHandles};
pub use version::{desired_python_version, VersionSpec, NATIVE, VERSION_ENV};
