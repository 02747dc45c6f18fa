//! Configuration management CLI commands.
//!
//! Provides `config init`, `config list`, and `config path`.

use clap::Subcommand;
use treasure_hunt::config::ConfigFile;

use super::common::Context;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a config file with default values if none exists
    Init,

    /// List all effective configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(ctx: &Context, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init => run_init(ctx),
        ConfigCommands::List => run_list(ctx),
        ConfigCommands::Path => run_path(ctx),
    }
}

fn run_init(ctx: &Context) -> Result<(), CliError> {
    let existed = ctx.config_path.exists();
    let path = ConfigFile::ensure_exists(&ctx.config_path)?;

    if existed {
        println!("Config file already exists: {}", path.display());
    } else {
        println!("Created config file: {}", path.display());
    }
    Ok(())
}

fn run_list(ctx: &Context) -> Result<(), CliError> {
    let config = &ctx.config;

    println!("[hunt]");
    println!("  find_radius = {} m", config.hunt.find_radius);
    println!("  warm_radius = {} m", config.hunt.warm_radius);
    println!("  debounce_ms = {}", config.hunt.debounce_ms);
    println!();
    println!("[store]");
    println!("  path = {}", config.store.path.display());
    println!();
    println!("[logging]");
    println!("  directory = {}", config.logging.directory.display());

    Ok(())
}

fn run_path(ctx: &Context) -> Result<(), CliError> {
    println!("{}", ctx.config_path.display());
    Ok(())
}
