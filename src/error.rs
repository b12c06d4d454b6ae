//! Error types for spark-prompt.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for prompt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Rejected input and user cancellation are not errors;
/// they surface as hints and [`Outcome::Cancelled`](crate::Outcome).
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("standard input is not a terminal")]
    NotATerminal,

    #[error("the terminal is already held by another prompt session")]
    SessionBusy,

    #[error("input stream closed")]
    InputClosed,

    #[error("failed to list entries under '{trail}': {message}")]
    Namespace { trail: String, message: String },

    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown theme preset '{0}'")]
    UnknownTheme(String),
}
