//! forgepy - Python environments for CI builds
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use forgepy::cli::{Cli, Commands};
use forgepy::config::{Config, ConfigManager};
use forgepy::error::{ForgepyError, ForgepyResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// Single-threaded: provisioning mutates the process environment
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        // Passthrough commands mirror the child's exit code
        Err(ForgepyError::ChildExit(code)) if (1..=255).contains(&code) => {
            ExitCode::from(code as u8)
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ForgepyResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = config_manager.load().await?;
    if let Some(ref dir) = cli.cache_home {
        config.cache.home = Some(dir.clone());
    }

    init_logging(cli.verbose, &config);
    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Setup(args) => forgepy::cli::commands::setup(args, &config).await,
        Commands::Resolve(args) => forgepy::cli::commands::resolve(args, &config).await,
        Commands::Python(args) => forgepy::cli::commands::python(args, &config).await,
        Commands::Pip(args) => forgepy::cli::commands::pip(args, &config).await,
        Commands::Clean(args) => forgepy::cli::commands::clean(args, &config).await,
        Commands::Config(args) => {
            forgepy::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("forgepy=warn"),
        1 => EnvFilter::new("forgepy=info"),
        _ => EnvFilter::new("forgepy=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
