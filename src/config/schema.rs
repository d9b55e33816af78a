//! Configuration schema for forgepy
//!
//! Configuration is stored at `~/.config/forgepy/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Python version selection
    pub python: PythonConfig,

    /// Miniforge distribution settings
    pub miniforge: MiniforgeConfig,

    /// Cache location
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Python version preference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    /// Requested version: "3", "3.x", "3.<minor>" or "native".
    /// Falls back to `$PY` when unset.
    pub version: Option<String>,
}

/// Miniforge installer source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiniforgeConfig {
    /// Release tag, e.g. "25.3.0-3"
    pub release: String,

    /// Base URL the release tag and asset name are appended to
    pub base_url: String,
}

impl Default for MiniforgeConfig {
    fn default() -> Self {
        Self {
            release: "25.3.0-3".to_string(),
            base_url: "https://github.com/conda-forge/miniforge/releases/download".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache home override. Falls back to `$FORGEPY_CACHE_HOME`,
    /// then the platform cache directory.
    pub home: Option<PathBuf>,
}
