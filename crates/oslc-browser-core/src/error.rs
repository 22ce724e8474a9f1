//! Error types for the OSLC browser

use thiserror::Error;

/// Code reported when a failure carries no HTTP status (transport or parse).
pub const GENERIC_FAILURE_CODE: u16 = 500;

/// Code reported when the server signals an authentication failure.
pub const UNAUTHORIZED_CODE: u16 = 401;

#[derive(Error, Debug)]
pub enum Error {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("authentication failed")]
    Unauthorized,

    #[error("http status {0}")]
    Status(u16),

    #[error("malformed rdf: {0}")]
    Parse(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported(operation.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Numeric code handed to callers: 401 for auth failures, the HTTP status
    /// when one was received, 500 otherwise.
    pub fn code(&self) -> u16 {
        match self {
            Self::Unauthorized => UNAUTHORIZED_CODE,
            Self::Status(status) => *status,
            _ => GENERIC_FAILURE_CODE,
        }
    }
}
