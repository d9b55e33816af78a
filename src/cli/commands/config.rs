//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{ForgepyError, ForgepyResult};
use crate::python::VersionSpec;
use crate::ui::{self, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const VALID_KEYS: [&str; 5] = [
    "general.log_format",
    "python.version",
    "miniforge.release",
    "miniforge.base_url",
    "cache.home",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> ForgepyResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let ctx = UiContext::detect();
            let mut updated = manager.load().await?;
            match apply_value(&mut updated, &key, &value) {
                Ok(()) => {
                    manager.save(&updated).await?;
                    ui::step_ok(&ctx, &format!("Set {} = {}", key, value));
                }
                Err(e) => {
                    ui::step_error_detail(&ctx, "Invalid config value", &e.to_string());
                    ui::remark(&ctx, &format!("Valid keys: {}", VALID_KEYS.join(", ")));
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> ForgepyResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> ForgepyResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());

    Ok(())
}

/// Set a dot-separated key on `config`, validating the value
fn apply_value(config: &mut Config, key: &str, value: &str) -> ForgepyResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => {
                return Err(ForgepyError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )))
            }
        },
        ["python", "version"] => {
            if value.is_empty() {
                config.python.version = None;
            } else {
                VersionSpec::parse(Some(value))?;
                config.python.version = Some(value.to_string());
            }
        }
        ["miniforge", "release"] => config.miniforge.release = value.to_string(),
        ["miniforge", "base_url"] => config.miniforge.base_url = value.to_string(),
        ["cache", "home"] => {
            config.cache.home = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        _ => return Err(ForgepyError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}
