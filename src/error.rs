//! Error types shared across the console.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`crate::process::Process`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Process is not running")]
    NotRunning,

    /// The read was removed by `exit`, or the console went away before a line arrived.
    #[error("Read request was abandoned")]
    ReadAbandoned,
}

/// Errors produced while splitting a command line into words.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unterminated {0} quote")]
    UnterminatedQuote(char),

    #[error("trailing escape character")]
    TrailingEscape,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type ProcessResult<T> = std::result::Result<T, ProcessError>;
