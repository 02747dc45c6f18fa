//! Treasure Hunt CLI - Command-line interface
//!
//! Hide treasures at GPS coordinates and hunt them down by replaying
//! location fixes.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use treasure_hunt::logging::{default_log_file, init_logging, LoggingGuard};

use commands::common::Context;
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Parser)]
#[command(name = "treasure-hunt")]
#[command(version, about = "Hide treasures at GPS coordinates and hunt them down", long_about = None)]
struct Cli {
    /// Config file (default: ~/.treasure-hunt/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treasure store file, overriding [store] path from the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a treasure at a coordinate
    Place {
        /// Treasure name (must be unique)
        #[arg(long)]
        name: String,

        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Horizontal accuracy of the position in meters
        #[arg(long)]
        accuracy: Option<f64>,
    },

    /// List placed treasures
    List {
        /// Include treasures that have already been found
        #[arg(long)]
        all: bool,
    },

    /// Delete every treasure
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Hunt for treasures using a stream of JSON location fixes
    Hunt {
        /// File of newline-delimited JSON fixes (default: stdin)
        #[arg(long)]
        fixes: Option<PathBuf>,

        /// Acknowledge finds immediately instead of waiting for Enter
        #[arg(long)]
        auto_ack: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::load(cli.config, cli.store)?;

    match cli.command {
        Commands::Config { command } => commands::config::run(&ctx, command),
        Commands::Place {
            name,
            lat,
            lon,
            accuracy,
        } => {
            let _guard = start_logging(&ctx)?;
            commands::place::run(&ctx, &name, lat, lon, accuracy)
        }
        Commands::List { all } => commands::list::run(&ctx, all),
        Commands::Clear { yes } => {
            let _guard = start_logging(&ctx)?;
            commands::clear::run(&ctx, yes)
        }
        Commands::Hunt { fixes, auto_ack } => {
            let _guard = start_logging(&ctx)?;
            tracing::info!(
                store = %ctx.config.store.path.display(),
                find_radius_m = ctx.config.hunt.find_radius,
                debounce_ms = ctx.config.hunt.debounce_ms,
                "Starting hunt"
            );
            commands::hunt::run(&ctx, fixes, auto_ack)
        }
    }
}

fn start_logging(ctx: &Context) -> Result<LoggingGuard, CliError> {
    init_logging(&ctx.config.logging.directory, default_log_file())
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}
