//! Application layer errors

use thiserror::Error;

/// Top-level relay errors
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Hub is no longer accepting messages")]
    HubClosed,
}

/// Errors reading from or writing to one connection.
///
/// Every variant is terminal for the connection it came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("peer disconnected")]
    Disconnected,

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("send timed out")]
    Timeout,
}

/// Command execution errors.
///
/// These are user-visible: the interpreter turns them into a bot reply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("cannot roll {0}")]
    CannotRoll(String),

    #[error("Command {0} not implemented")]
    NotImplemented(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
