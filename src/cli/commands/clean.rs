//! Clean command - remove the shared Miniforge install and installer cache

use crate::cli::args::CleanArgs;
use crate::config::Config;
use crate::error::{ForgepyError, ForgepyResult};
use crate::paths;
use crate::ui::{self, UiContext};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Execute the clean command
pub async fn execute(args: CleanArgs, config: &Config) -> ForgepyResult<()> {
    let ctx = UiContext::detect().with_auto_yes(args.yes);
    let cache_home = paths::cache_home(config.cache.home.as_deref());
    clean(&ctx, &cache_home).await
}

async fn clean(ctx: &UiContext, cache_home: &Path) -> ForgepyResult<()> {
    let targets = clean_targets(cache_home);
    ui::intro(ctx, "Clean forgepy cache");

    let existing: Vec<&PathBuf> = targets.iter().filter(|p| p.exists()).collect();
    if existing.is_empty() {
        ui::step_ok_detail(ctx, "Nothing to clean", &cache_home.display().to_string());
        return Ok(());
    }

    for path in &existing {
        ui::remark(ctx, &path.display().to_string());
    }

    // Without a TTY or --yes, the default is to keep everything
    if !ui::confirm(ctx, "Remove these directories?", false).await? {
        ui::step_warn_hint(ctx, "Nothing removed", "Pass --yes to skip confirmation");
        return Ok(());
    }

    for path in existing {
        remove_dir(path).await?;
        ui::step_ok(ctx, &format!("Removed {}", path.display()));
    }

    ui::outro_success(ctx, "Cache cleaned");
    Ok(())
}

/// Directories owned by forgepy under a cache home
fn clean_targets(cache_home: &Path) -> Vec<PathBuf> {
    vec![paths::miniforge_prefix(cache_home), paths::deps_dir(cache_home)]
}

async fn remove_dir(path: &Path) -> ForgepyResult<()> {
    debug!("Removing {}", path.display());
    tokio::fs::remove_dir_all(path)
        .await
        .map_err(|e| ForgepyError::io(format!("removing {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn targets_are_under_cache_home() {
        let targets = clean_targets(Path::new("/c"));
        assert_eq!(
            targets,
            vec![PathBuf::from("/c/miniforge"), PathBuf::from("/c/deps")]
        );
    }

    #[tokio::test]
    async fn clean_with_yes_removes_targets() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().to_path_buf();
        std::fs::create_dir_all(home.join("miniforge").join("bin")).unwrap();
        std::fs::create_dir_all(home.join("deps")).unwrap();
        std::fs::write(home.join("keep.txt"), "x").unwrap();

        let ctx = UiContext::non_interactive().with_auto_yes(true);
        clean(&ctx, &home).await.unwrap();

        assert!(!home.join("miniforge").exists());
        assert!(!home.join("deps").exists());
        assert!(home.join("keep.txt").exists());
    }

    #[tokio::test]
    async fn clean_without_confirmation_keeps_everything() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().to_path_buf();
        std::fs::create_dir_all(home.join("miniforge")).unwrap();

        clean(&UiContext::non_interactive(), &home).await.unwrap();
        assert!(home.join("miniforge").exists());
    }
}
