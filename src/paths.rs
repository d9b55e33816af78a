//! Cache directory layout

use std::path::{Path, PathBuf};

/// Environment variable overriding the cache home
pub const CACHE_HOME_ENV: &str = "FORGEPY_CACHE_HOME";

/// Resolve the cache home.
///
/// Precedence: explicit override, `$FORGEPY_CACHE_HOME`, the platform cache
/// directory, then `./.forgepy-cache`.
pub fn cache_home(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }

    if let Some(dir) = std::env::var_os(CACHE_HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    dirs::cache_dir()
        .map(|d| d.join("forgepy"))
        .unwrap_or_else(|| PathBuf::from(".forgepy-cache"))
}

/// Shared Miniforge install prefix under a cache home
pub fn miniforge_prefix(cache_home: &Path) -> PathBuf {
    cache_home.join("miniforge")
}

/// Downloaded installer cache under a cache home
pub fn deps_dir(cache_home: &Path) -> PathBuf {
    cache_home.join("deps")
}
