//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// forgepy - Python environments for CI builds
///
/// Provisions a Miniforge-based Python environment (or uses the host
/// interpreter) and exposes ready-to-use python and pip commands.
#[derive(Parser, Debug)]
#[command(name = "forgepy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FORGEPY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache directory holding Miniforge and downloaded installers
    #[arg(long, global = true)]
    pub cache_home: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision Python and print the python/pip commands
    Setup(SetupArgs),

    /// Print the resolved Python version
    Resolve(VersionArgs),

    /// Run the provisioned python with the given arguments
    Python(ExecArgs),

    /// Run the provisioned pip with the given arguments
    Pip(ExecArgs),

    /// Remove the Miniforge installation and downloaded installers
    Clean(CleanArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Version selection shared by commands that provision
#[derive(Parser, Debug, Clone, Default)]
pub struct VersionArgs {
    /// Python version: 3, 3.x, 3.<minor> or native (default: config, then $PY)
    #[arg(long)]
    pub python: Option<String>,
}

/// Arguments for the setup command
#[derive(Parser, Debug)]
pub struct SetupArgs {
    #[command(flatten)]
    pub version: VersionArgs,

    /// Print a JSON report instead of progress output
    #[arg(long, conflicts_with = "export")]
    pub json: bool,

    /// Print POSIX shell export statements for the environment changes
    #[arg(long)]
    pub export: bool,

    /// Append environment changes to $GITHUB_ENV and $GITHUB_PATH
    #[arg(long)]
    pub github_env: bool,
}

/// Arguments for the python and pip passthrough commands
#[derive(Parser, Debug)]
pub struct ExecArgs {
    #[command(flatten)]
    pub version: VersionArgs,

    /// Arguments passed through to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<OsString>,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., python.version)
        key: String,
        /// Value to set
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pip_passthrough_keeps_hyphen_args() {
        let cli = Cli::parse_from(["forgepy", "pip", "--python", "3.10", "--", "install", "-U", "wheel"]);
        match cli.command {
            Commands::Pip(args) => {
                assert_eq!(args.version.python.as_deref(), Some("3.10"));
                assert_eq!(args.args, vec!["install", "-U", "wheel"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_cache_home() {
        let cli = Cli::parse_from(["forgepy", "setup", "--cache-home", "/ci/cache"]);
        assert_eq!(cli.cache_home, Some(PathBuf::from("/ci/cache")));
    }

    #[test]
    fn json_conflicts_with_export() {
        assert!(Cli::try_parse_from(["forgepy", "setup", "--json", "--export"]).is_err());
    }
}
