//! Base error types for fmtgate
//!
//! Every fatal condition a format check can hit lives here. A formatting
//! mismatch is deliberately absent: it is a failing check outcome, not an error.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type shared by all fmtgate crates
#[derive(Error, Debug)]
pub enum Error {
    /// The tool could not be resolved on the search path
    #[error("Command {tool} not found")]
    ToolNotFound { tool: String },

    /// The tool wrote to standard error during a run that should be clean
    #[error("Unexpected stderr received from {tool}:\n{stderr}")]
    UnexpectedStderr { tool: String, stderr: String },

    /// No version token could be extracted from `--version` output
    #[error("Received `{output}` from {tool} --version; unable to parse a version")]
    VersionParse { tool: String, output: String },

    /// The installed tool does not match the version pinned with `--version=`
    #[error("Version of {tool} is wrong. Expected version: {expected}, found version: {actual}")]
    VersionMismatch {
        tool: String,
        expected: String,
        actual: String,
    },

    /// Separator-style tool invoked without a `--` token
    #[error("{tool} requires a `--` separating tool flags from files")]
    MissingSeparator { tool: String },

    /// The child process could not be started
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Error reading a target file
    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tool output or file contents are not valid UTF-8
    #[error("Invalid UTF-8 in {path}: {source}")]
    InvalidUtf8 {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
