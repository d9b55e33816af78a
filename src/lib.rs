//! forgepy - Python environments for CI builds
//!
//! Provisions a Python interpreter from a shared Miniforge installation (or
//! uses the host interpreter) and returns command handles for `python` and
//! `pip`, updating `PATH` and the CMake `Python*_ROOT_DIR` variables.

pub mod cli;
pub mod config;
pub mod download;
pub mod env;
pub mod error;
pub mod paths;
pub mod platform;
pub mod python;
pub mod shell;
pub mod ui;

pub use error::{ForgepyError, ForgepyResult};
