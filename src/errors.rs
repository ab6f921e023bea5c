use thiserror::Error;
use uuid::Uuid;

/// Error type shared by the billing engine, services, and storage.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid subscription: {0}")]
    Validation(String),
    #[error("Subscription not found: {0}")]
    NotFound(Uuid),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Storage(err.to_string())
    }
}

impl From<csv::Error> for TrackerError {
    fn from(err: csv::Error) -> Self {
        TrackerError::Storage(format!("CSV write error: {err}"))
    }
}

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] TrackerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}
