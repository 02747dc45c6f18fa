//! CLI error handling with user-friendly messages.
//!
//! Every command returns `Result<(), CliError>`; `main` prints the error and
//! exits with status 1.

use std::fmt;
use std::process;
use treasure_hunt::config::ConfigFileError;
use treasure_hunt::place::PlaceError;
use treasure_hunt::store::StoreError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be read or written
    Config(ConfigFileError),
    /// Treasure store failure
    Store(StoreError),
    /// A treasure could not be placed
    Place(PlaceError),
    /// Failed to open a fix input file
    FileRead { path: String, error: std::io::Error },
    /// Async runtime failure
    Runtime(String),
    /// A destructive command was not confirmed
    NotConfirmed(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Place(PlaceError::Store(StoreError::DuplicateId(_))) => {
                eprintln!();
                eprintln!("Treasure names must be unique. Run 'treasure-hunt list --all'");
                eprintln!("to see the names already in use.");
            }
            CliError::Config(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value in config.ini or delete the line to use the default.");
                eprintln!("Run 'treasure-hunt config path' to locate the file.");
            }
            CliError::NotConfirmed(_) => {
                eprintln!();
                eprintln!("Re-run with --yes to confirm.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Store(e) => write!(f, "Treasure store error: {}", e),
            CliError::Place(e) => write!(f, "{}", e),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path, error)
            }
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            CliError::NotConfirmed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Store(e) => Some(e),
            CliError::Place(e) => Some(e),
            CliError::FileRead { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}

impl From<PlaceError> for CliError {
    fn from(e: PlaceError) -> Self {
        CliError::Place(e)
    }
}
